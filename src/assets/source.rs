use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use image::RgbaImage;

use crate::foundation::error::{StkrError, StkrResult};
use crate::selection::model::AssetRef;

/// Requested delivery quality.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Delivery {
    /// Best available quality, even if slower.
    #[default]
    HighQuality,
    /// Whatever is quickest, e.g. a cached thumbnail.
    Fast,
}

/// How an asset should be resolved to pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvePolicy {
    /// Requested delivery quality.
    pub delivery: Delivery,
    /// Whether the source may fetch over the network.
    pub network_allowed: bool,
    /// Bounding box to fit into, preserving aspect. `None` means full resolution.
    pub target: Option<(u32, u32)>,
}

impl ResolvePolicy {
    /// Full resolution, best quality, network allowed. Used by export.
    pub fn full_quality() -> Self {
        Self {
            delivery: Delivery::HighQuality,
            network_allowed: true,
            target: None,
        }
    }

    /// Preview tile request: `max_dim * aspect` wide and `max_dim` tall.
    pub fn thumbnail(aspect: f64, max_dim: u32) -> Self {
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            1.0
        };
        let w = (f64::from(max_dim) * aspect).round().clamp(1.0, f64::from(u32::MAX)) as u32;
        Self {
            delivery: Delivery::Fast,
            network_allowed: true,
            target: Some((w, max_dim.max(1))),
        }
    }
}

impl Default for ResolvePolicy {
    fn default() -> Self {
        Self::full_quality()
    }
}

/// Decoded straight-alpha RGBA8 pixels for one asset.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedImage {
    /// Pixel data.
    pub pixels: RgbaImage,
}

impl ResolvedImage {
    /// Wrap decoded pixels.
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Downscale to fit `policy.target`, if any. Never upscales.
    pub fn fit_to(self, policy: &ResolvePolicy) -> Self {
        match policy.target {
            Some((w, h)) if self.width() > w || self.height() > h => Self {
                pixels: image::DynamicImage::ImageRgba8(self.pixels)
                    .thumbnail(w, h)
                    .to_rgba8(),
            },
            _ => self,
        }
    }
}

/// Library of pickable images.
///
/// Implementations must be callable from worker threads; export resolves assets concurrently.
pub trait AssetSource: Send + Sync {
    /// Intrinsic pixel size, used when a selection is created.
    fn dimensions(&self, asset: &AssetRef) -> StkrResult<(u32, u32)>;

    /// Resolve pixel data. Failures are reported per asset.
    fn resolve(&self, asset: &AssetRef, policy: ResolvePolicy) -> StkrResult<ResolvedImage>;
}

#[derive(Clone, Debug)]
struct MemoryEntry {
    pixels: RgbaImage,
    failures_left: u32,
    delay: Option<Duration>,
}

/// In-memory asset source with deterministic failure injection.
#[derive(Debug, Default)]
pub struct MemoryAssetSource {
    entries: Mutex<HashMap<AssetRef, MemoryEntry>>,
    resolve_calls: AtomicU64,
}

impl MemoryAssetSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `pixels` under `asset`.
    pub fn insert(&self, asset: impl Into<AssetRef>, pixels: RgbaImage) {
        self.put(
            asset.into(),
            MemoryEntry {
                pixels,
                failures_left: 0,
                delay: None,
            },
        );
    }

    /// Register an asset whose dimensions are known but whose pixels never resolve.
    pub fn insert_broken(&self, asset: impl Into<AssetRef>, width: u32, height: u32) {
        self.put(
            asset.into(),
            MemoryEntry {
                pixels: RgbaImage::new(width, height),
                failures_left: u32::MAX,
                delay: None,
            },
        );
    }

    /// Register an asset that fails its first `failures` resolutions, then succeeds.
    pub fn insert_flaky(&self, asset: impl Into<AssetRef>, pixels: RgbaImage, failures: u32) {
        self.put(
            asset.into(),
            MemoryEntry {
                pixels,
                failures_left: failures,
                delay: None,
            },
        );
    }

    /// Register an asset that blocks for `delay` before resolving.
    pub fn insert_slow(&self, asset: impl Into<AssetRef>, pixels: RgbaImage, delay: Duration) {
        self.put(
            asset.into(),
            MemoryEntry {
                pixels,
                failures_left: 0,
                delay: Some(delay),
            },
        );
    }

    /// Number of `resolve` calls so far, including failed ones.
    pub fn resolve_calls(&self) -> u64 {
        self.resolve_calls.load(Ordering::Relaxed)
    }

    fn put(&self, asset: AssetRef, entry: MemoryEntry) {
        if let Ok(mut map) = self.entries.lock() {
            map.insert(asset, entry);
        }
    }
}

impl AssetSource for MemoryAssetSource {
    fn dimensions(&self, asset: &AssetRef) -> StkrResult<(u32, u32)> {
        let map = self
            .entries
            .lock()
            .map_err(|_| StkrError::asset_resolution("memory source lock poisoned"))?;
        map.get(asset)
            .map(|e| e.pixels.dimensions())
            .ok_or_else(|| StkrError::asset_resolution(format!("unknown asset '{asset}'")))
    }

    fn resolve(&self, asset: &AssetRef, policy: ResolvePolicy) -> StkrResult<ResolvedImage> {
        self.resolve_calls.fetch_add(1, Ordering::Relaxed);

        let (pixels, delay) = {
            let mut map = self
                .entries
                .lock()
                .map_err(|_| StkrError::asset_resolution("memory source lock poisoned"))?;
            let entry = map
                .get_mut(asset)
                .ok_or_else(|| StkrError::asset_resolution(format!("unknown asset '{asset}'")))?;
            if entry.failures_left > 0 {
                if entry.failures_left != u32::MAX {
                    entry.failures_left -= 1;
                }
                return Err(StkrError::asset_resolution(format!(
                    "asset '{asset}' is unavailable"
                )));
            }
            (entry.pixels.clone(), entry.delay)
        };

        if let Some(d) = delay {
            std::thread::sleep(d);
        }
        Ok(ResolvedImage::new(pixels).fit_to(&policy))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
