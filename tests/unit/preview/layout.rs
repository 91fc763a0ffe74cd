use super::*;
use crate::selection::model::ImageSelection;

fn export_canvas() -> CanvasGeometry {
    CanvasGeometry::new(2160.0, 3840.0, 60.0)
}

fn landscape_pair() -> CompositionState {
    let mut s = CompositionState::new();
    s.add(ImageSelection::new("a", 1920.0, 1080.0));
    s.add(ImageSelection::new("b", 1920.0, 1080.0));
    s
}

#[test]
fn preview_scales_canvas_height_and_gap_with_width() {
    let p = PreviewLayout::new(&landscape_pair(), export_canvas(), 360.0);
    assert!((p.scale() - 1.0 / 6.0).abs() < 1e-12);
    assert!((p.display_size().height - 640.0).abs() < 1e-9);
    assert!((p.canvas().gap - 10.0).abs() < 1e-9);
}

#[test]
fn preview_matches_export_geometry_up_to_scale() {
    let state = landscape_pair();
    let p = PreviewLayout::new(&state, export_canvas(), 360.0);
    let export = compute_layout(&state.aspect_ratios(), export_canvas());
    for (preview, full) in p.rects().iter().zip(&export) {
        let back = p.to_export(preview);
        assert!((back.width - full.width).abs() < 1e-9);
        assert!((back.height - full.height).abs() < 1e-9);
        assert!((back.y - full.y).abs() < 1e-9);
    }
}

#[test]
fn slot_lookup_hits_rects_and_misses_gaps() {
    let p = PreviewLayout::new(&landscape_pair(), export_canvas(), 360.0);
    assert_eq!(p.slot_at(Point::new(180.0, 200.0)), Some(0));
    assert_eq!(p.slot_at(Point::new(180.0, 320.0)), None);
    assert_eq!(p.slot_at(Point::new(180.0, 400.0)), Some(1));
    assert_eq!(p.slot_at(Point::new(180.0, 50.0)), None);
    assert_eq!(p.slot_at(Point::new(-1.0, 200.0)), None);
}

#[test]
fn frames_are_absolute_display_rects() {
    let p = PreviewLayout::new(&landscape_pair(), export_canvas(), 360.0);
    let f = p.frame(1).unwrap();
    assert!((f.x0 - 0.0).abs() < 1e-9);
    assert!((f.y0 - 325.0).abs() < 1e-9);
    assert!(p.frame(2).is_none());
}

#[test]
fn empty_state_has_no_slots() {
    let p = PreviewLayout::new(&CompositionState::new(), export_canvas(), 360.0);
    assert!(p.rects().is_empty());
    assert_eq!(p.slot_at(Point::new(10.0, 10.0)), None);
}
