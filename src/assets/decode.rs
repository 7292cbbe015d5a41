use anyhow::Context;
use resvg::tiny_skia;

use crate::{
    foundation::error::{MockupError, MockupResult},
    foundation::math::{demultiply_rgba8_in_place, premultiply_rgba8_in_place},
};

/// Premultiplied RGBA8 raster used between pipeline stages.
pub type Raster = tiny_skia::Pixmap;

/// Decode an encoded raster (PNG, JPEG, WebP, ...) into a premultiplied [`Raster`].
///
/// `what` names the source ("logo", "template") in the error message.
pub fn decode_raster(bytes: &[u8], what: &str) -> MockupResult<Raster> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| MockupError::image_decode(format!("{what}: {e}")))?;
    raster_from_rgba(dyn_img.to_rgba8())
}

/// Wrap straight-alpha RGBA pixels into a premultiplied [`Raster`].
pub fn raster_from_rgba(img: image::RgbaImage) -> MockupResult<Raster> {
    let (width, height) = img.dimensions();
    let size = tiny_skia::IntSize::from_wh(width, height)
        .ok_or_else(|| MockupError::image_decode(format!("empty raster {width}x{height}")))?;

    let mut rgba8_premul = img.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    tiny_skia::Pixmap::from_vec(rgba8_premul, size)
        .ok_or_else(|| MockupError::render(format!("failed to wrap {width}x{height} raster")))
}

/// Copy a [`Raster`] out into straight-alpha RGBA pixels.
pub fn raster_to_rgba(raster: &Raster) -> MockupResult<image::RgbaImage> {
    let mut rgba = raster.data().to_vec();
    demultiply_rgba8_in_place(&mut rgba);
    image::RgbaImage::from_raw(raster.width(), raster.height(), rgba)
        .context("raster buffer does not match its dimensions")
        .map_err(MockupError::from)
}

/// Allocate a transparent raster.
pub fn new_raster(width: u32, height: u32) -> MockupResult<Raster> {
    tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        MockupError::render(format!("failed to allocate {width}x{height} raster"))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
