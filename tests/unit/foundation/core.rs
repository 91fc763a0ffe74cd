use super::*;

#[test]
fn scaled_applies_one_factor_to_every_dimension() {
    let g = CanvasGeometry::new(2160.0, 3840.0, 60.0).scaled(0.5);
    assert_eq!(g, CanvasGeometry::new(1080.0, 1920.0, 30.0));
}

#[test]
fn display_width_keeps_canvas_aspect() {
    let g = CanvasGeometry::new(2160.0, 3840.0, 60.0).for_display_width(360.0);
    assert!((g.width - 360.0).abs() < 1e-9);
    assert!((g.height - 640.0).abs() < 1e-9);
    assert!((g.gap - 10.0).abs() < 1e-9);
    assert!((g.aspect() - 16.0 / 9.0).abs() < 1e-12);
}

#[test]
fn display_scale_is_zero_for_degenerate_inputs() {
    let g = CanvasGeometry::new(2160.0, 3840.0, 60.0);
    assert_eq!(g.display_scale(0.0), 0.0);
    assert_eq!(g.display_scale(f64::NAN), 0.0);
    assert_eq!(CanvasGeometry::new(0.0, 10.0, 0.0).display_scale(100.0), 0.0);
}

#[test]
fn pixel_size_rounds_and_validates() {
    assert_eq!(
        CanvasGeometry::new(2160.0, 3840.0, 60.0).pixel_size().unwrap(),
        (2160, 3840)
    );
    assert_eq!(
        CanvasGeometry::new(99.6, 10.2, 0.0).pixel_size().unwrap(),
        (100, 10)
    );
    assert!(CanvasGeometry::new(0.0, 10.0, 0.0).pixel_size().is_err());
    assert!(CanvasGeometry::new(f64::INFINITY, 10.0, 0.0).pixel_size().is_err());
}
