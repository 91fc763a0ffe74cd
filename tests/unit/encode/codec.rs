use super::*;

fn surface() -> RgbaImage {
    RgbaImage::from_pixel(16, 8, image::Rgba([200, 30, 30, 255]))
}

#[test]
fn jpeg_output_is_decodable_and_close() {
    let out = encode_surface(&surface(), OutputFormat::Jpeg, 95).unwrap();
    assert_eq!(&out.bytes[..2], &[0xFF, 0xD8]);
    assert_eq!((out.width, out.height), (16, 8));
    assert_eq!(out.file_extension(), "jpg");
    assert_eq!(out.mime_type(), "image/jpeg");

    let back = image::load_from_memory(&out.bytes).unwrap().to_rgb8();
    assert_eq!(back.dimensions(), (16, 8));
    let px = back.get_pixel(8, 4).0;
    assert!((i16::from(px[0]) - 200).abs() <= 8);
    assert!((i16::from(px[1]) - 30).abs() <= 8);
}

#[test]
fn png_output_is_lossless() {
    let out = encode_surface(&surface(), OutputFormat::Png, 95).unwrap();
    assert_eq!(&out.bytes[1..4], b"PNG");
    let back = image::load_from_memory(&out.bytes).unwrap().to_rgba8();
    assert_eq!(back, surface());
}

#[test]
fn invalid_quality_and_empty_surface_are_encoding_errors() {
    assert!(matches!(
        encode_surface(&surface(), OutputFormat::Jpeg, 0),
        Err(StkrError::Encoding(_))
    ));
    assert!(matches!(
        encode_surface(&RgbaImage::new(0, 0), OutputFormat::Png, 95),
        Err(StkrError::Encoding(_))
    ));
}
