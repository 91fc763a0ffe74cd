use crate::foundation::core::{CanvasGeometry, Rect};

/// Placement of one image inside the canvas.
///
/// Images are always horizontally centered, so only the vertical offset is stored.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutRect {
    /// Drawn width.
    pub width: f64,
    /// Drawn height.
    pub height: f64,
    /// Offset of the top edge from the canvas top.
    pub y: f64,
}

impl LayoutRect {
    /// Horizontal offset that centers this rect on a canvas `canvas_width` wide.
    pub fn x(&self, canvas_width: f64) -> f64 {
        (canvas_width - self.width) / 2.0
    }

    /// Absolute rectangle on a canvas `canvas_width` wide.
    pub fn to_rect(&self, canvas_width: f64) -> Rect {
        let x = self.x(canvas_width);
        Rect::new(x, self.y, x + self.width, self.y + self.height)
    }

    /// Uniformly scale every component by `k`.
    pub fn scale(&self, k: f64) -> Self {
        Self {
            width: self.width * k,
            height: self.height * k,
            y: self.y * k,
        }
    }
}

/// Full result of one stack computation.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StackLayout {
    /// One rect per input, same order.
    pub rects: Vec<LayoutRect>,
    /// Shrink factor applied to the full-width heights (1.0 when everything fits).
    pub scale: f64,
    /// Height of the stack including gaps.
    pub used_height: f64,
}

/// Vertical stack layout: fill width, shrink to fit height, center the remainder.
///
/// Pure and deterministic: identical inputs always produce bit-identical rects. Preview and
/// export both call this with differently scaled geometry.
pub fn compute_layout(aspect_ratios: &[f64], canvas: CanvasGeometry) -> Vec<LayoutRect> {
    plan_stack(aspect_ratios, canvas).rects
}

/// Same as [`compute_layout`], also reporting the applied scale and the used height.
pub fn plan_stack(aspect_ratios: &[f64], canvas: CanvasGeometry) -> StackLayout {
    if aspect_ratios.is_empty() {
        return StackLayout {
            rects: Vec::new(),
            scale: 1.0,
            used_height: 0.0,
        };
    }

    let n = aspect_ratios.len();
    let gap = sanitize_len(canvas.gap);
    let width = sanitize_len(canvas.width);
    let height = sanitize_len(canvas.height);
    let total_gap = (n - 1) as f64 * gap;
    let avail = (height - total_gap).max(0.0);

    let aspects: Vec<f64> = aspect_ratios.iter().copied().map(sanitize_aspect).collect();
    let ideal: Vec<f64> = aspects.iter().map(|a| width / a).collect();
    let total_ideal: f64 = ideal.iter().sum();

    let scale = if total_ideal > avail {
        avail / total_ideal
    } else {
        1.0
    };

    let heights: Vec<f64> = ideal.iter().map(|h| h * scale).collect();
    let used_height = heights.iter().sum::<f64>() + total_gap;

    let mut y = (height - used_height) / 2.0;
    let mut rects = Vec::with_capacity(n);
    for (idx, (&h, &a)) in heights.iter().zip(&aspects).enumerate() {
        rects.push(LayoutRect {
            width: h * a,
            height: h,
            y,
        });
        y += h;
        if idx + 1 < n {
            y += gap;
        }
    }

    StackLayout {
        rects,
        scale,
        used_height,
    }
}

fn sanitize_aspect(a: f64) -> f64 {
    if a.is_finite() && a > 0.0 { a } else { 1.0 }
}

fn sanitize_len(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// Integer-aligned rect on the export surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Snap a layout rect onto the pixel grid by rounding its edges.
///
/// Rounding edges rather than sizes keeps vertically adjacent rects disjoint after snapping.
pub fn snap_to_pixels(rect: &LayoutRect, canvas_width: f64) -> PixelRect {
    let r = rect.to_rect(canvas_width);
    let x0 = r.x0.round().max(0.0);
    let y0 = r.y0.round().max(0.0);
    let x1 = r.x1.round().max(x0);
    let y1 = r.y1.round().max(y0);
    PixelRect {
        x: x0 as u32,
        y: y0 as u32,
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/stack.rs"]
mod tests;
