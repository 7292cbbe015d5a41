use resvg::tiny_skia;

use crate::{
    assets::decode::Raster,
    foundation::error::MockupResult,
    geometry::resolve::ResolvedLayer,
    model::blend::BlendMode,
    model::customizations::Customizations,
    render::layer::{apply_opacity, grayscale_layer, resize_layer, rotate_layer, tint_layer},
};

/// Draw `layer` onto `canvas` with its top-left at `(left, top)` using `mode`.
///
/// Only the layer's rectangle is affected; parts outside the canvas are cropped. The mode is
/// mapped before anything is drawn, so unsupported operators leave `canvas` untouched.
pub fn composite_layer(
    canvas: &mut Raster,
    layer: &Raster,
    left: i32,
    top: i32,
    mode: BlendMode,
) -> MockupResult<()> {
    let paint = tiny_skia::PixmapPaint {
        opacity: 1.0,
        blend_mode: mode.to_tiny_skia()?,
        quality: tiny_skia::FilterQuality::Nearest,
    };

    let off_canvas = i64::from(left) >= i64::from(canvas.width())
        || i64::from(top) >= i64::from(canvas.height())
        || i64::from(left) + i64::from(layer.width()) <= 0
        || i64::from(top) + i64::from(layer.height()) <= 0;
    if off_canvas {
        return Ok(());
    }

    canvas.draw_pixmap(
        left,
        top,
        layer.as_ref(),
        &paint,
        tiny_skia::Transform::identity(),
        None,
    );
    Ok(())
}

/// Run the logo through resize, rotate, tint, grayscale and opacity, in that order.
pub fn prepare_logo(
    logo: Raster,
    resolved: &ResolvedLayer,
    customizations: &Customizations,
) -> MockupResult<Raster> {
    let mut layer = resize_layer(logo, resolved.pixel_width, resolved.pixel_height)?;
    layer = rotate_layer(layer, resolved.rotation_deg)?;
    if let Some(tint) = customizations.tint {
        layer = tint_layer(layer, tint);
    }
    if customizations.grayscale() {
        layer = grayscale_layer(layer);
    }
    Ok(apply_opacity(layer, customizations.opacity()))
}

/// Composite the transformed logo onto the template and return the template canvas.
///
/// The output always has the template's dimensions.
#[tracing::instrument(skip_all, fields(mode = %customizations.blend_mode()))]
pub fn composite_logo(
    mut template: Raster,
    logo: Raster,
    resolved: &ResolvedLayer,
    customizations: &Customizations,
) -> MockupResult<Raster> {
    let mode = customizations.blend_mode();
    // Fail on unmapped operators before spending time on the layer.
    mode.to_tiny_skia()?;

    let layer = prepare_logo(logo, resolved, customizations)?;
    let (left, top) = resolved.placement_for(layer.width(), layer.height());
    tracing::debug!(
        width = layer.width(),
        height = layer.height(),
        left,
        top,
        "placing logo layer"
    );

    composite_layer(&mut template, &layer, left, top, mode)?;
    Ok(template)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
