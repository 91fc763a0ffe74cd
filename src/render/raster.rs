use image::{Rgba, RgbaImage, imageops};
use rayon::prelude::*;

use crate::assets::source::ResolvedImage;
use crate::foundation::core::CanvasGeometry;
use crate::foundation::error::{StkrError, StkrResult};
use crate::layout::stack::{LayoutRect, PixelRect, snap_to_pixels};

/// Largest surface we are willing to allocate, in bytes.
const MAX_SURFACE_BYTES: u64 = 1 << 31;

/// Draw `images` into their layout rects on an opaque canvas-sized surface.
///
/// `images[i]` is drawn into `rects[i]`, in sequence order. Tiles are resized in parallel and
/// copied serially; rects are vertically disjoint so draw order only matters for determinism.
pub fn rasterize(
    images: &[ResolvedImage],
    rects: &[LayoutRect],
    canvas: CanvasGeometry,
    background_rgb: [u8; 3],
) -> StkrResult<RgbaImage> {
    if images.is_empty() {
        return Err(StkrError::rasterization("no images to compose"));
    }
    if images.len() != rects.len() {
        return Err(StkrError::rasterization(format!(
            "{} images for {} layout rects",
            images.len(),
            rects.len()
        )));
    }

    let (width, height) = canvas
        .pixel_size()
        .map_err(|e| StkrError::rasterization(e.to_string()))?;
    let bytes = u64::from(width) * u64::from(height) * 4;
    if bytes > MAX_SURFACE_BYTES {
        return Err(StkrError::rasterization(format!(
            "surface {width}x{height} exceeds {MAX_SURFACE_BYTES} bytes"
        )));
    }

    let placements: Vec<PixelRect> = rects
        .iter()
        .map(|r| snap_to_pixels(r, canvas.width))
        .collect();
    for (idx, p) in placements.iter().enumerate() {
        if p.x.saturating_add(p.width) > width || p.y.saturating_add(p.height) > height {
            return Err(StkrError::rasterization(format!(
                "rect {idx} ({p:?}) falls outside the {width}x{height} surface"
            )));
        }
    }

    let [r, g, b] = background_rgb;
    let mut surface = RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255]));

    let tiles: Vec<Option<RgbaImage>> = images
        .par_iter()
        .zip(placements.par_iter())
        .map(|(img, p)| fit_tile(img, p))
        .collect();

    for (tile, p) in tiles.iter().zip(&placements) {
        if let Some(tile) = tile {
            imageops::overlay(&mut surface, tile, i64::from(p.x), i64::from(p.y));
        }
    }

    tracing::debug!(width, height, tiles = placements.len(), "rasterized composition");
    Ok(surface)
}

fn fit_tile(img: &ResolvedImage, p: &PixelRect) -> Option<RgbaImage> {
    if p.width == 0 || p.height == 0 || img.width() == 0 || img.height() == 0 {
        return None;
    }
    if img.width() == p.width && img.height() == p.height {
        return Some(img.pixels.clone());
    }
    Some(imageops::resize(
        &img.pixels,
        p.width,
        p.height,
        imageops::FilterType::Lanczos3,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
