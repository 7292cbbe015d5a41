//! Text overlays rendered through usvg/resvg.
//!
//! The overlay is described as a small SVG document, rasterized into its own layer and
//! composited source-over, centred on the canvas.

use std::{
    path::PathBuf,
    sync::{Arc, OnceLock},
};

use resvg::tiny_skia;

use crate::{
    assets::decode::{Raster, new_raster},
    assets::fonts::{build_font_db, font_resolver},
    foundation::core::BezPath,
    foundation::error::{MockupError, MockupResult},
    model::blend::BlendMode,
    model::customizations::{TextAlign, TextLayout, TextOptions},
    render::composite::composite_layer,
};

/// Id of the clip path element in path-clipped overlays.
pub const CLIP_PATH_ID: &str = "textClipPath";

/// Renders text overlays; the font database is loaded on first use and shared afterwards.
#[derive(Debug, Default)]
pub struct TextRenderer {
    font_dirs: Vec<PathBuf>,
    fontdb: OnceLock<Arc<usvg::fontdb::Database>>,
}

impl TextRenderer {
    /// Renderer that loads system fonts plus fonts from `font_dirs`.
    pub fn new(font_dirs: Vec<PathBuf>) -> Self {
        Self {
            font_dirs,
            fontdb: OnceLock::new(),
        }
    }

    /// Renderer over an already built font database.
    pub fn with_fontdb(fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self {
            font_dirs: Vec::new(),
            fontdb: OnceLock::from(fontdb),
        }
    }

    fn fontdb(&self) -> Arc<usvg::fontdb::Database> {
        self.fontdb
            .get_or_init(|| build_font_db(&self.font_dirs))
            .clone()
    }

    /// Rasterize `options` and composite the result onto `canvas`.
    #[tracing::instrument(skip_all, fields(chars = options.text.chars().count()))]
    pub fn render_overlay(&self, canvas: &mut Raster, options: &TextOptions) -> MockupResult<()> {
        let (width, height) = text_layer_size(canvas.width(), canvas.height(), options);
        let svg = build_text_svg(width, height, options)?;
        let layer = self.rasterize(&svg, width, height)?;

        let left = (i64::from(canvas.width()) - i64::from(width)) / 2;
        let top = (i64::from(canvas.height()) - i64::from(height)) / 2;
        composite_layer(
            canvas,
            &layer,
            clamp_i32(left),
            clamp_i32(top),
            BlendMode::Over,
        )
    }

    fn rasterize(&self, svg: &str, width: u32, height: u32) -> MockupResult<Raster> {
        let opts = usvg::Options {
            fontdb: self.fontdb(),
            font_resolver: font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(svg, &opts)
            .map_err(|e| MockupError::render(format!("text overlay svg: {e}")))?;

        let mut pixmap = new_raster(width, height)?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
        Ok(pixmap)
    }
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Size of the text layer: a strip `fontSize * 1.5` tall for plain text, the whole canvas when
/// clipping to a path.
///
/// The strip never exceeds the canvas height; it is centred and the canvas crops it anyway.
pub fn text_layer_size(canvas_width: u32, canvas_height: u32, options: &TextOptions) -> (u32, u32) {
    match options.layout {
        TextLayout::Strip => {
            let max = canvas_height.max(1);
            let h = (options.font_size * 1.5).ceil();
            let h = if h.is_finite() {
                h.clamp(1.0, f64::from(max)) as u32
            } else {
                max
            };
            (canvas_width, h)
        }
        TextLayout::ClipPath(_) => (canvas_width, canvas_height),
    }
}

/// Parse clip path data; empty or malformed data is a [`MockupError::TextClip`].
pub fn parse_clip_path(d: &str) -> MockupResult<BezPath> {
    let d = d.trim();
    if d.is_empty() {
        return Err(MockupError::text_clip("textPath must be non-empty"));
    }
    BezPath::from_svg(d).map_err(|e| MockupError::text_clip(format!("invalid textPath: {e}")))
}

/// SVG document for a `width x height` text layer.
///
/// Text, font family and path data are XML-escaped. The baseline sits at the vertical middle
/// and the anchor follows the alignment.
pub fn build_text_svg(width: u32, height: u32, options: &TextOptions) -> MockupResult<String> {
    let clip = match &options.layout {
        TextLayout::Strip => None,
        TextLayout::ClipPath(d) => {
            parse_clip_path(d)?;
            Some(d.trim())
        }
    };

    let (x, anchor) = match options.align {
        TextAlign::Left => (0.0, "start"),
        TextAlign::Center => (f64::from(width) / 2.0, "middle"),
        TextAlign::Right => (f64::from(width), "end"),
    };
    let y = f64::from(height) / 2.0;

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    if let Some(d) = clip {
        svg.push_str(&format!(
            r#"<defs><clipPath id="{CLIP_PATH_ID}"><path d="{}"/></clipPath></defs><g clip-path="url(#{CLIP_PATH_ID})">"#,
            xml_escape(d)
        ));
    }

    let stroke = options
        .stroke
        .as_ref()
        .map(|s| format!(r#" stroke="{}" stroke-width="{}""#, s.color.to_hex(), s.width))
        .unwrap_or_default();
    svg.push_str(&format!(
        r#"<text x="{x}" y="{y}" font-family="{}" font-size="{}" fill="{}" text-anchor="{anchor}" dominant-baseline="middle"{stroke}>{}</text>"#,
        xml_escape(&options.font_family),
        options.font_size,
        options.color.to_hex(),
        xml_escape(&options.text),
    ));

    if clip.is_some() {
        svg.push_str("</g>");
    }
    svg.push_str("</svg>");
    Ok(svg)
}

/// Escape the five XML special characters.
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
