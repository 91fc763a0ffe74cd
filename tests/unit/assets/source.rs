use super::*;

fn solid(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]))
}

#[test]
fn thumbnail_policy_targets_aspect_scaled_box() {
    let p = ResolvePolicy::thumbnail(0.5, 2160);
    assert_eq!(p.target, Some((1080, 2160)));
    assert_eq!(p.delivery, Delivery::Fast);
    assert_eq!(ResolvePolicy::thumbnail(f64::NAN, 100).target, Some((100, 100)));
    assert_eq!(ResolvePolicy::default(), ResolvePolicy::full_quality());
}

#[test]
fn fit_to_downscales_but_never_upscales() {
    let big = ResolvedImage::new(solid(400, 200)).fit_to(&ResolvePolicy::thumbnail(2.0, 50));
    assert_eq!((big.width(), big.height()), (100, 50));

    let small = ResolvedImage::new(solid(10, 5)).fit_to(&ResolvePolicy::thumbnail(2.0, 50));
    assert_eq!((small.width(), small.height()), (10, 5));

    let full = ResolvedImage::new(solid(400, 200)).fit_to(&ResolvePolicy::full_quality());
    assert_eq!(full.width(), 400);
}

#[test]
fn memory_source_reports_dimensions_and_pixels() {
    let src = MemoryAssetSource::new();
    src.insert("a", solid(4, 3));
    let a = AssetRef::new("a");
    assert_eq!(src.dimensions(&a).unwrap(), (4, 3));
    let img = src.resolve(&a, ResolvePolicy::full_quality()).unwrap();
    assert_eq!(img.pixels.get_pixel(0, 0).0, [10, 20, 30, 255]);
    assert_eq!(src.resolve_calls(), 1);
}

#[test]
fn unknown_and_broken_assets_fail_per_asset() {
    let src = MemoryAssetSource::new();
    src.insert_broken("bad", 8, 8);
    assert!(matches!(
        src.resolve(&AssetRef::new("missing"), ResolvePolicy::full_quality()),
        Err(StkrError::AssetResolution(_))
    ));
    assert_eq!(src.dimensions(&AssetRef::new("bad")).unwrap(), (8, 8));
    for _ in 0..3 {
        assert!(src
            .resolve(&AssetRef::new("bad"), ResolvePolicy::full_quality())
            .is_err());
    }
}

#[test]
fn flaky_assets_recover_after_configured_failures() {
    let src = MemoryAssetSource::new();
    src.insert_flaky("f", solid(2, 2), 2);
    let f = AssetRef::new("f");
    assert!(src.resolve(&f, ResolvePolicy::full_quality()).is_err());
    assert!(src.resolve(&f, ResolvePolicy::full_quality()).is_err());
    assert!(src.resolve(&f, ResolvePolicy::full_quality()).is_ok());
    assert_eq!(src.resolve_calls(), 3);
}
