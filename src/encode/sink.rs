use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::encode::codec::ExportOutput;
use crate::foundation::error::{StkrError, StkrResult};

/// Destination for finished exports.
///
/// Only successful exports reach a sink; a failed export never calls `persist`.
pub trait OutputSink: Send {
    /// Persist one encoded composition.
    fn persist(&mut self, output: &ExportOutput) -> StkrResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    outputs: Vec<ExportOutput>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow persisted outputs in arrival order.
    pub fn outputs(&self) -> &[ExportOutput] {
        &self.outputs
    }
}

impl OutputSink for InMemorySink {
    fn persist(&mut self, output: &ExportOutput) -> StkrResult<()> {
        self.outputs.push(output.clone());
        Ok(())
    }
}

/// Writes each export as a new file in a directory.
///
/// Bytes go to a hidden temp file first and are renamed into place, so readers never observe a
/// partially written image.
#[derive(Debug)]
pub struct FileSink {
    dir: PathBuf,
    stem: String,
    written: Vec<PathBuf>,
}

impl FileSink {
    /// Write files named `<stem>-<n>.<ext>` into `dir`.
    pub fn new(dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            stem: stem.into(),
            written: Vec::new(),
        }
    }

    /// Paths written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn next_path(&self, ext: &str) -> PathBuf {
        let mut n = self.written.len() + 1;
        loop {
            let p = self.dir.join(format!("{}-{n}.{ext}", self.stem));
            if !p.exists() {
                return p;
            }
            n += 1;
        }
    }
}

impl OutputSink for FileSink {
    fn persist(&mut self, output: &ExportOutput) -> StkrResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir {}", self.dir.display()))
            .map_err(|e| StkrError::output(format!("{e:#}")))?;

        let dest = self.next_path(output.file_extension());
        let tmp = tmp_path_for(&dest);
        let res = std::fs::write(&tmp, &output.bytes)
            .with_context(|| format!("write {}", tmp.display()))
            .and_then(|()| {
                std::fs::rename(&tmp, &dest)
                    .with_context(|| format!("rename {} -> {}", tmp.display(), dest.display()))
            });
        if let Err(e) = res {
            std::fs::remove_file(&tmp).ok();
            return Err(StkrError::output(format!("{e:#}")));
        }

        tracing::debug!(path = %dest.display(), bytes = output.bytes.len(), "persisted export");
        self.written.push(dest);
        Ok(())
    }
}

fn tmp_path_for(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
