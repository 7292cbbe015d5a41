//! Customization parameters to pixel geometry.
//!
//! Pure math, no pixels: everything here is independently testable from the raster stages.

use crate::{
    foundation::core::{Canvas, Point, Size},
    model::customizations::Customizations,
};

/// Placement of the logo layer on the template.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedLayer {
    /// Exact scaled logo size; the aspect ratio equals the source logo's.
    pub size: Size,
    /// Resize target width, rounded, at least 1.
    pub pixel_width: u32,
    /// Resize target height, rounded, at least 1.
    pub pixel_height: u32,
    /// Requested logo centre.
    pub center: Point,
    /// Top-left x of the unrotated layer, clamped to `>= 0`.
    pub left: i32,
    /// Top-left y of the unrotated layer, clamped to `>= 0`.
    pub top: i32,
    /// Clockwise rotation in degrees.
    pub rotation_deg: f64,
}

impl ResolvedLayer {
    /// Top-left for a processed layer of `width x height`.
    ///
    /// Rotation grows the layer to its bounding box; the growth over the resized size is split
    /// evenly on both sides of [`Self::left`]/[`Self::top`], clamped to `>= 0`. An unrotated
    /// layer lands exactly on [`Self::left`]/[`Self::top`].
    pub fn placement_for(&self, width: u32, height: u32) -> (i32, i32) {
        fn shift(origin: i32, processed: u32, resized: u32) -> i32 {
            let grow = (i64::from(processed) - i64::from(resized)).div_euclid(2);
            (i64::from(origin) - grow).clamp(0, i64::from(i32::MAX)) as i32
        }

        (
            shift(self.left, width, self.pixel_width),
            shift(self.top, height, self.pixel_height),
        )
    }
}

/// Fit a logo of aspect ratio `aspect` (width / height) into
/// `min(canvas.width, canvas.height) * scale`, preserving the aspect ratio.
pub fn fit_logo_size(canvas: Canvas, aspect: f64, scale: f64) -> Size {
    let max_logo_size = f64::from(canvas.min_side()) * scale;
    if aspect > 1.0 {
        Size::new(max_logo_size, max_logo_size / aspect)
    } else {
        Size::new(max_logo_size * aspect, max_logo_size)
    }
}

/// Centre-anchored position to top-left, each coordinate clamped to `>= 0`.
///
/// The upper bound is left open: a layer may extend past the right or bottom edge and is
/// cropped by the canvas.
pub fn top_left(center: Point, size: Size) -> (i32, i32) {
    fn clamp_coord(v: f64) -> i32 {
        if v.is_nan() {
            return 0;
        }
        v.round().clamp(0.0, f64::from(i32::MAX)) as i32
    }

    (
        clamp_coord(center.x - size.width / 2.0),
        clamp_coord(center.y - size.height / 2.0),
    )
}

/// Resolve the logo layer for a template of `canvas` size and a logo of
/// `logo_width x logo_height` pixels.
pub fn resolve_layer(
    canvas: Canvas,
    logo_width: u32,
    logo_height: u32,
    customizations: &Customizations,
) -> ResolvedLayer {
    let aspect = if logo_height == 0 {
        1.0
    } else {
        f64::from(logo_width) / f64::from(logo_height)
    };

    let size = fit_logo_size(canvas, aspect, customizations.scale());
    let center = customizations.position_or_center(canvas);
    let (left, top) = top_left(center, size);

    ResolvedLayer {
        size,
        pixel_width: to_pixels(size.width),
        pixel_height: to_pixels(size.height),
        center,
        left,
        top,
        rotation_deg: customizations.rotation(),
    }
}

fn to_pixels(v: f64) -> u32 {
    if !v.is_finite() {
        return 1;
    }
    v.round().clamp(1.0, f64::from(u32::MAX)) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/resolve.rs"]
mod tests;
