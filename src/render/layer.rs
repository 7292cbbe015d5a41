//! Logo layer transforms, applied in order: resize, rotate, tint, grayscale, opacity.
//!
//! Each step consumes a premultiplied [`Raster`] and returns the next one.

use image::imageops::FilterType;
use resvg::tiny_skia;

use crate::{
    assets::decode::{Raster, new_raster},
    foundation::core::{Affine, Rect, Rgb8},
    foundation::error::{MockupError, MockupResult},
    foundation::math::{clamp_premultiplied_in_place, luma_u8, mul_div255_u8, unit_to_u8},
};

/// Resample to exactly `width x height` with a Lanczos3 filter.
///
/// Filtering runs on premultiplied pixels so transparent edges do not bleed colour. Same-size
/// requests return the input untouched.
pub fn resize_layer(layer: Raster, width: u32, height: u32) -> MockupResult<Raster> {
    if layer.width() == width && layer.height() == height {
        return Ok(layer);
    }

    let (src_w, src_h) = (layer.width(), layer.height());
    let src = image::RgbaImage::from_raw(src_w, src_h, layer.take())
        .ok_or_else(|| MockupError::render("layer buffer does not match its dimensions"))?;

    let mut resized = image::imageops::resize(&src, width, height, FilterType::Lanczos3).into_raw();
    clamp_premultiplied_in_place(&mut resized);

    let size = tiny_skia::IntSize::from_wh(width, height)
        .ok_or_else(|| MockupError::render(format!("invalid resize target {width}x{height}")))?;
    tiny_skia::Pixmap::from_vec(resized, size)
        .ok_or_else(|| MockupError::render("failed to wrap resized layer"))
}

/// Pixel size of the axis-aligned bounding box of a `width x height` layer rotated by
/// `degrees`.
pub fn rotated_bounds(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    let rect = Rect::new(0.0, 0.0, f64::from(width), f64::from(height));
    let bbox = Affine::rotate(degrees.to_radians()).transform_rect_bbox(rect);
    // Trig noise on right angles must not add a pixel.
    let snap = |v: f64| ((v - 1e-6).ceil().max(1.0)) as u32;
    (snap(bbox.width()), snap(bbox.height()))
}

/// Rotate clockwise by `degrees` about the layer centre.
///
/// The canvas grows to the rotated bounding box and uncovered pixels stay transparent, so
/// callers must re-measure the returned layer.
pub fn rotate_layer(layer: Raster, degrees: f64) -> MockupResult<Raster> {
    if !degrees.is_finite() {
        return Err(MockupError::render(format!("invalid rotation {degrees}")));
    }
    if degrees.rem_euclid(360.0) == 0.0 {
        return Ok(layer);
    }

    let (w, h) = (layer.width() as f32, layer.height() as f32);
    let (out_w, out_h) = rotated_bounds(layer.width(), layer.height(), degrees);
    let mut out = new_raster(out_w, out_h)?;

    let transform = tiny_skia::Transform::from_translate(-w / 2.0, -h / 2.0)
        .post_rotate(degrees as f32)
        .post_translate(out_w as f32 / 2.0, out_h as f32 / 2.0);

    let paint = tiny_skia::PixmapPaint {
        quality: tiny_skia::FilterQuality::Bicubic,
        ..tiny_skia::PixmapPaint::default()
    };
    out.draw_pixmap(0, 0, layer.as_ref(), &paint, transform, None);
    Ok(out)
}

/// Recolour non-transparent pixels toward `tint`, scaling the tint by each pixel's luma.
///
/// White becomes the tint colour, black stays black, alpha is preserved.
pub fn tint_layer(mut layer: Raster, tint: Rgb8) -> Raster {
    let tint = [tint.r, tint.g, tint.b];
    for px in layer.data_mut().chunks_exact_mut(4) {
        if px[3] == 0 {
            continue;
        }
        let y = u16::from(luma_u8(px[0], px[1], px[2]));
        for (c, t) in px[..3].iter_mut().zip(tint) {
            *c = mul_div255_u8(u16::from(t), y);
        }
    }
    layer
}

/// Replace colour with Rec. 709 luma; alpha is preserved.
pub fn grayscale_layer(mut layer: Raster) -> Raster {
    for px in layer.data_mut().chunks_exact_mut(4) {
        let y = luma_u8(px[0], px[1], px[2]);
        px[0] = y;
        px[1] = y;
        px[2] = y;
    }
    layer
}

/// Premultiply the whole layer (alpha included) by `opacity`.
pub fn apply_opacity(mut layer: Raster, opacity: f64) -> Raster {
    let op = unit_to_u8(opacity);
    if op == 255 {
        return layer;
    }
    for b in layer.data_mut() {
        *b = mul_div255_u8(u16::from(*b), op);
    }
    layer
}

#[cfg(test)]
#[path = "../../tests/unit/render/layer.rs"]
mod tests;
