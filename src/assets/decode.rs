use anyhow::Context;

use crate::assets::source::ResolvedImage;
use crate::foundation::error::{StkrError, StkrResult};

/// Decode encoded image bytes into straight-alpha RGBA8.
pub fn decode_image(bytes: &[u8]) -> StkrResult<ResolvedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(|e| StkrError::asset_resolution(format!("{e:#}")))?;
    Ok(ResolvedImage::new(dyn_img.to_rgba8()))
}

/// Read only the header of encoded bytes to get the pixel size.
pub fn header_dimensions(bytes: &[u8]) -> StkrResult<(u32, u32)> {
    let reader = image::ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .context("guess image format")
        .map_err(|e| StkrError::asset_resolution(format!("{e:#}")))?;
    reader
        .into_dimensions()
        .context("read image header")
        .map_err(|e| StkrError::asset_resolution(format!("{e:#}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
