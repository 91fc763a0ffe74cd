use std::io::Cursor;

use anyhow::Context;
use image::codecs::{jpeg::JpegEncoder, png::PngEncoder};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};

use crate::foundation::config::OutputFormat;
use crate::foundation::error::{StkrError, StkrResult};

/// A finished, encoded composition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOutput {
    /// Encoded bytes.
    pub bytes: Vec<u8>,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Container of `bytes`.
    pub format: OutputFormat,
}

impl ExportOutput {
    /// File extension matching `format`.
    pub fn file_extension(&self) -> &'static str {
        self.format.extension()
    }

    /// MIME type matching `format`.
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Compress a finished surface.
///
/// The surface is opaque, so JPEG output drops the alpha channel. `quality` only applies to
/// JPEG and must be within `1..=100`.
pub fn encode_surface(
    surface: &RgbaImage,
    format: OutputFormat,
    quality: u8,
) -> StkrResult<ExportOutput> {
    let (width, height) = surface.dimensions();
    if width == 0 || height == 0 {
        return Err(StkrError::encoding("cannot encode an empty surface"));
    }

    let mut bytes = Vec::new();
    let mut cursor = Cursor::new(&mut bytes);
    let res = match format {
        OutputFormat::Jpeg => {
            if !(1..=100).contains(&quality) {
                return Err(StkrError::encoding(format!(
                    "jpeg quality {quality} outside 1..=100"
                )));
            }
            let rgb = DynamicImage::ImageRgba8(surface.clone()).to_rgb8();
            JpegEncoder::new_with_quality(&mut cursor, quality)
                .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                .context("encode jpeg")
        }
        OutputFormat::Png => PngEncoder::new(&mut cursor)
            .write_image(surface.as_raw(), width, height, ExtendedColorType::Rgba8)
            .context("encode png"),
    };
    res.map_err(|e| StkrError::encoding(format!("{e:#}")))?;

    tracing::debug!(?format, quality, len = bytes.len(), "encoded surface");
    Ok(ExportOutput {
        bytes,
        width,
        height,
        format,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/codec.rs"]
mod tests;
