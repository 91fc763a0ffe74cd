use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::assets::decode::{decode_image, header_dimensions};
use crate::assets::source::{AssetSource, ResolvePolicy, ResolvedImage};
use crate::foundation::error::{StkrError, StkrResult};
use crate::selection::model::AssetRef;

/// Normalize and validate library-relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> StkrResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(StkrError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(StkrError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(StkrError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(StkrError::validation("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

/// Asset source backed by image files under a library root directory.
///
/// Asset references are paths relative to the root. There is no network tier, so
/// `network_allowed` has no effect.
#[derive(Clone, Debug)]
pub struct FileAssetSource {
    root: PathBuf,
}

impl FileAssetSource {
    /// Serve files below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Library root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_bytes(&self, asset: &AssetRef) -> StkrResult<Vec<u8>> {
        let norm = normalize_rel_path(asset.as_str())
            .map_err(|e| StkrError::asset_resolution(e.to_string()))?;
        let path = self.root.join(Path::new(&norm));
        std::fs::read(&path)
            .with_context(|| format!("read asset bytes from {}", path.display()))
            .map_err(|e| StkrError::asset_resolution(format!("{e:#}")))
    }
}

impl AssetSource for FileAssetSource {
    fn dimensions(&self, asset: &AssetRef) -> StkrResult<(u32, u32)> {
        header_dimensions(&self.read_bytes(asset)?)
    }

    fn resolve(&self, asset: &AssetRef, policy: ResolvePolicy) -> StkrResult<ResolvedImage> {
        let bytes = self.read_bytes(asset)?;
        Ok(decode_image(&bytes)?.fit_to(&policy))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/file.rs"]
mod tests;
