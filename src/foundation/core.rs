use crate::foundation::error::{StkrError, StkrResult};

pub use kurbo::{Point, Rect, Size};

/// Canvas dimensions and inter-image gap, all in the same length unit.
///
/// Export uses canvas pixels; the preview uses the same geometry scaled to the display.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CanvasGeometry {
    /// Canvas width.
    pub width: f64,
    /// Canvas height.
    pub height: f64,
    /// Vertical gap between consecutive images.
    pub gap: f64,
}

impl CanvasGeometry {
    /// Build geometry from raw values.
    pub const fn new(width: f64, height: f64, gap: f64) -> Self {
        Self { width, height, gap }
    }

    /// Uniformly scale every dimension by `k`.
    pub fn scaled(self, k: f64) -> Self {
        Self {
            width: self.width * k,
            height: self.height * k,
            gap: self.gap * k,
        }
    }

    /// Geometry for a preview that is `display_width` wide, keeping the canvas aspect.
    pub fn for_display_width(self, display_width: f64) -> Self {
        self.scaled(self.display_scale(display_width))
    }

    /// Linear factor mapping canvas units onto a display `display_width` wide.
    ///
    /// Returns 0 for degenerate canvases or display widths.
    pub fn display_scale(self, display_width: f64) -> f64 {
        if !self.width.is_finite() || self.width <= 0.0 {
            return 0.0;
        }
        if !display_width.is_finite() || display_width <= 0.0 {
            return 0.0;
        }
        display_width / self.width
    }

    /// Height divided by width.
    pub fn aspect(self) -> f64 {
        if self.width > 0.0 {
            self.height / self.width
        } else {
            0.0
        }
    }

    /// Canvas size as a `kurbo` size.
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Integer surface size used for rasterization.
    pub fn pixel_size(self) -> StkrResult<(u32, u32)> {
        fn dim(v: f64, name: &str) -> StkrResult<u32> {
            if !v.is_finite() || v < 1.0 {
                return Err(StkrError::validation(format!(
                    "canvas {name} must be finite and >= 1, got {v}"
                )));
            }
            let r = v.round();
            if r > f64::from(u32::MAX) {
                return Err(StkrError::validation(format!(
                    "canvas {name} {v} exceeds u32"
                )));
            }
            Ok(r as u32)
        }

        Ok((dim(self.width, "width")?, dim(self.height, "height")?))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
