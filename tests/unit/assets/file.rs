use std::io::Cursor;

use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "stkr_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./a//b.png").unwrap(), "a/b.png");
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./.").is_err());
}

#[test]
fn file_source_reads_headers_and_resolves() {
    let tmp = temp_dir("file_source");
    std::fs::create_dir_all(tmp.join("roll")).unwrap();

    let img = image::RgbaImage::from_pixel(6, 4, image::Rgba([1, 2, 3, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(tmp.join("roll/a.png"), &buf).unwrap();

    let src = FileAssetSource::new(&tmp);
    let a = AssetRef::new("roll/a.png");
    assert_eq!(src.dimensions(&a).unwrap(), (6, 4));
    let full = src.resolve(&a, ResolvePolicy::full_quality()).unwrap();
    assert_eq!((full.width(), full.height()), (6, 4));
    let thumb = src.resolve(&a, ResolvePolicy::thumbnail(1.5, 2)).unwrap();
    assert_eq!((thumb.width(), thumb.height()), (3, 2));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn file_source_rejects_escaping_and_missing_paths() {
    let src = FileAssetSource::new(std::env::temp_dir());
    assert!(matches!(
        src.resolve(&AssetRef::new("../etc/passwd"), ResolvePolicy::full_quality()),
        Err(StkrError::AssetResolution(_))
    ));
    assert!(matches!(
        src.dimensions(&AssetRef::new("stkr_definitely_missing.png")),
        Err(StkrError::AssetResolution(_))
    ));
}
