use super::*;
use crate::layout::stack::compute_layout;

fn solid(w: u32, h: u32, rgb: [u8; 3]) -> ResolvedImage {
    ResolvedImage::new(RgbaImage::from_pixel(w, h, Rgba([rgb[0], rgb[1], rgb[2], 255])))
}

fn near(px: &Rgba<u8>, rgb: [u8; 3]) -> bool {
    px.0[..3]
        .iter()
        .zip(rgb)
        .all(|(&a, b)| (i16::from(a) - i16::from(b)).abs() <= 2)
        && px.0[3] == 255
}

#[test]
fn tiles_land_in_their_rects_over_background() {
    let canvas = CanvasGeometry::new(20.0, 40.0, 0.0);
    let images = [solid(10, 10, [255, 0, 0]), solid(40, 20, [0, 0, 255])];
    let rects = compute_layout(&[1.0, 2.0], canvas);
    let out = rasterize(&images, &rects, canvas, [0, 0, 0]).unwrap();

    assert_eq!(out.dimensions(), (20, 40));
    assert!(near(out.get_pixel(10, 2), [0, 0, 0]));
    assert!(near(out.get_pixel(10, 10), [255, 0, 0]));
    assert!(near(out.get_pixel(10, 30), [0, 0, 255]));
    assert!(near(out.get_pixel(10, 37), [0, 0, 0]));
}

#[test]
fn narrow_tiles_are_centered_with_background_sides() {
    let canvas = CanvasGeometry::new(40.0, 20.0, 0.0);
    let images = [solid(10, 20, [0, 255, 0])];
    let rects = compute_layout(&[0.5], canvas);
    let out = rasterize(&images, &rects, canvas, [9, 9, 9]).unwrap();

    assert!(near(out.get_pixel(20, 10), [0, 255, 0]));
    assert!(near(out.get_pixel(2, 10), [9, 9, 9]));
    assert!(near(out.get_pixel(37, 10), [9, 9, 9]));
}

#[test]
fn translucent_pixels_blend_onto_opaque_background() {
    let canvas = CanvasGeometry::new(4.0, 4.0, 0.0);
    let images = [ResolvedImage::new(RgbaImage::from_pixel(
        4,
        4,
        Rgba([255, 255, 255, 0]),
    ))];
    let rects = compute_layout(&[1.0], canvas);
    let out = rasterize(&images, &rects, canvas, [0, 0, 0]).unwrap();
    assert!(out.pixels().all(|p| near(p, [0, 0, 0])));
}

#[test]
fn empty_input_is_a_rasterization_error() {
    let err = rasterize(&[], &[], CanvasGeometry::new(10.0, 10.0, 0.0), [0, 0, 0]).unwrap_err();
    assert!(matches!(err, StkrError::Rasterization(_)));
}

#[test]
fn count_mismatch_is_a_rasterization_error() {
    let canvas = CanvasGeometry::new(10.0, 10.0, 0.0);
    let rects = compute_layout(&[1.0, 1.0], canvas);
    let err = rasterize(&[solid(1, 1, [0, 0, 0])], &rects, canvas, [0, 0, 0]).unwrap_err();
    assert!(matches!(err, StkrError::Rasterization(_)));
}

#[test]
fn oversized_or_degenerate_surfaces_are_rejected() {
    let images = [solid(1, 1, [0, 0, 0])];
    let huge = CanvasGeometry::new(100_000.0, 100_000.0, 0.0);
    let rects = compute_layout(&[1.0], huge);
    assert!(matches!(
        rasterize(&images, &rects, huge, [0, 0, 0]),
        Err(StkrError::Rasterization(_))
    ));

    let empty = CanvasGeometry::new(0.0, 10.0, 0.0);
    let rects = compute_layout(&[1.0], empty);
    assert!(matches!(
        rasterize(&images, &rects, empty, [0, 0, 0]),
        Err(StkrError::Rasterization(_))
    ));
}

#[test]
fn rects_outside_the_surface_are_rejected() {
    let canvas = CanvasGeometry::new(10.0, 10.0, 0.0);
    let rects = [LayoutRect {
        width: 10.0,
        height: 10.0,
        y: 5.0,
    }];
    assert!(matches!(
        rasterize(&[solid(2, 2, [1, 1, 1])], &rects, canvas, [0, 0, 0]),
        Err(StkrError::Rasterization(_))
    ));
}
