use crate::foundation::core::{CanvasGeometry, Point, Rect, Size};
use crate::layout::stack::{LayoutRect, compute_layout};
use crate::selection::model::SelectionId;
use crate::selection::state::CompositionState;

/// Stack geometry at on-screen scale.
///
/// Built from the same [`compute_layout`] call the exporter uses, on the export canvas scaled
/// by `display_width / canvas_width`.
#[derive(Clone, Debug, PartialEq)]
pub struct PreviewLayout {
    canvas: CanvasGeometry,
    scale: f64,
    rects: Vec<LayoutRect>,
    ids: Vec<SelectionId>,
}

impl PreviewLayout {
    /// Lay out `state` for a preview `display_width` wide.
    pub fn new(state: &CompositionState, export_canvas: CanvasGeometry, display_width: f64) -> Self {
        let scale = export_canvas.display_scale(display_width);
        let canvas = export_canvas.scaled(scale);
        let rects = compute_layout(&state.aspect_ratios(), canvas);
        let ids = state.images().iter().map(|s| s.id()).collect();
        Self {
            canvas,
            scale,
            rects,
            ids,
        }
    }

    /// Rects in display units, in stacking order.
    pub fn rects(&self) -> &[LayoutRect] {
        &self.rects
    }

    /// Selection identity of each rect.
    pub fn ids(&self) -> &[SelectionId] {
        &self.ids
    }

    /// Display units per canvas unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Display-scaled canvas geometry.
    pub fn canvas(&self) -> CanvasGeometry {
        self.canvas
    }

    /// Preview frame size.
    pub fn display_size(&self) -> Size {
        self.canvas.size()
    }

    /// Absolute display rect of slot `index`.
    pub fn frame(&self, index: usize) -> Option<Rect> {
        self.rects.get(index).map(|r| r.to_rect(self.canvas.width))
    }

    /// Slot under `point` (display coordinates, canvas origin top-left).
    pub fn slot_at(&self, point: Point) -> Option<usize> {
        slot_at(&self.rects, self.canvas.width, point)
    }

    /// Map a preview rect back to export canvas units.
    pub fn to_export(&self, rect: &LayoutRect) -> LayoutRect {
        if self.scale > 0.0 {
            rect.scale(1.0 / self.scale)
        } else {
            *rect
        }
    }
}

/// Index of the rect containing `point`, if any. Gaps and margins hit nothing.
pub fn slot_at(rects: &[LayoutRect], canvas_width: f64, point: Point) -> Option<usize> {
    rects
        .iter()
        .position(|r| r.to_rect(canvas_width).contains(point))
}

#[cfg(test)]
#[path = "../../tests/unit/preview/layout.rs"]
mod tests;
