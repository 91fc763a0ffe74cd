use crate::foundation::core::CanvasGeometry;
use crate::foundation::error::{StkrError, StkrResult};

/// Maximum number of images in one composition.
pub const MAX_IMAGES: usize = 4;
/// Minimum number of images required before an export may start.
pub const MIN_IMAGES: usize = 1;
/// Export canvas width in pixels.
pub const CANVAS_WIDTH: f64 = 2160.0;
/// Export canvas height in pixels.
pub const CANVAS_HEIGHT: f64 = 3840.0;
/// Gap between stacked images, in canvas pixels.
pub const GAP: f64 = 60.0;
/// Lossy compression quality (1..=100).
pub const COMPRESSION_QUALITY: u8 = 95;

/// Encoded output container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossy JPEG at [`ComposeConfig::compression_quality`].
    #[default]
    Jpeg,
    /// Lossless PNG; quality is ignored.
    Png,
}

impl OutputFormat {
    /// Conventional file extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    /// MIME type of the encoded bytes.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

/// Process-wide composition settings.
///
/// Treated as read-only once a session is created.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposeConfig {
    /// Export canvas width in pixels.
    pub canvas_width: f64,
    /// Export canvas height in pixels.
    pub canvas_height: f64,
    /// Gap between stacked images, in canvas pixels.
    pub gap: f64,
    /// Maximum number of selections.
    pub selection_cap: usize,
    /// Minimum number of selections for export.
    pub min_exportable: usize,
    /// Lossy compression quality (1..=100).
    pub compression_quality: u8,
    /// Encoded output container.
    pub output_format: OutputFormat,
    /// Opaque background fill.
    pub background_rgb: [u8; 3],
    /// Deadline for resolving every asset of one export.
    pub resolve_timeout_ms: u64,
    /// Extra attempts per asset after the first failure.
    pub resolve_retries: u32,
    /// Delay before the first retry; each later retry doubles it.
    pub resolve_backoff_ms: u64,
    /// Worker threads used for asset resolution. `None` uses rayon defaults.
    pub resolve_threads: Option<usize>,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            gap: GAP,
            selection_cap: MAX_IMAGES,
            min_exportable: MIN_IMAGES,
            compression_quality: COMPRESSION_QUALITY,
            output_format: OutputFormat::Jpeg,
            background_rgb: [0, 0, 0],
            resolve_timeout_ms: 30_000,
            resolve_retries: 2,
            resolve_backoff_ms: 200,
            resolve_threads: None,
        }
    }
}

impl ComposeConfig {
    /// Export canvas geometry.
    pub fn canvas(&self) -> CanvasGeometry {
        CanvasGeometry::new(self.canvas_width, self.canvas_height, self.gap)
    }

    /// Deadline for one export's asset resolution.
    pub fn resolve_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.resolve_timeout_ms)
    }

    /// Delay before retry number `attempt` (1-based), doubling up to 64x the base.
    pub fn retry_delay(&self, attempt: u32) -> std::time::Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(6);
        std::time::Duration::from_millis(self.resolve_backoff_ms).saturating_mul(factor)
    }

    /// Check every option against its allowed range.
    pub fn validate(&self) -> StkrResult<()> {
        for (name, v) in [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
        ] {
            if !v.is_finite() || v < 1.0 {
                return Err(StkrError::validation(format!(
                    "{name} must be finite and >= 1"
                )));
            }
        }
        if !self.gap.is_finite() || self.gap < 0.0 {
            return Err(StkrError::validation("gap must be finite and >= 0"));
        }
        if self.selection_cap == 0 {
            return Err(StkrError::validation("selection_cap must be >= 1"));
        }
        if self.min_exportable == 0 || self.min_exportable > self.selection_cap {
            return Err(StkrError::validation(
                "min_exportable must be within 1..=selection_cap",
            ));
        }
        let gaps = (self.selection_cap - 1) as f64 * self.gap;
        if gaps >= self.canvas_height {
            return Err(StkrError::validation(
                "gaps for a full selection leave no vertical room on the canvas",
            ));
        }
        if !(1..=100).contains(&self.compression_quality) {
            return Err(StkrError::validation(
                "compression_quality must be within 1..=100",
            ));
        }
        if self.resolve_timeout_ms == 0 {
            return Err(StkrError::validation("resolve_timeout_ms must be > 0"));
        }
        if self.resolve_threads == Some(0) {
            return Err(StkrError::validation(
                "resolve_threads must be >= 1 when set",
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> StkrResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| StkrError::validation(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Serialize as pretty JSON.
    pub fn to_json_string(&self) -> StkrResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StkrError::Other(anyhow::Error::new(e).context("serialize config")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
