use crate::{
    assets::decode::{Raster, decode_raster},
    assets::encode::{OutputFormat, encode_raster},
    foundation::core::Canvas,
    foundation::error::{MockupResult, Stage},
    geometry::resolve::resolve_layer,
    model::customizations::Customizations,
    render::composite::composite_logo,
    render::layer::resize_layer,
    render::text::TextRenderer,
};

/// Longest thumbnail side by default.
pub const DEFAULT_THUMBNAIL_MAX: u32 = 400;

/// Encodings and thumbnail bound for one render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderSettings {
    /// Encoding of the full-size render.
    pub render_format: OutputFormat,
    /// Encoding of the thumbnail.
    pub thumbnail_format: OutputFormat,
    /// Bounding box side for the thumbnail.
    pub thumbnail_max: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            render_format: OutputFormat::Jpeg { quality: 95 },
            thumbnail_format: OutputFormat::Jpeg { quality: 80 },
            thumbnail_max: DEFAULT_THUMBNAIL_MAX,
        }
    }
}

/// Decoded inputs of one render. Immutable once built.
#[derive(Clone, Debug)]
pub struct MockupRequest {
    /// Decoded logo.
    pub logo: Raster,
    /// Decoded template; its size is the render size.
    pub template: Raster,
    /// Validated customizations.
    pub customizations: Customizations,
}

impl MockupRequest {
    /// Validate `customizations`, then decode both sources.
    pub fn decode(
        logo_bytes: &[u8],
        template_bytes: &[u8],
        customizations: Customizations,
    ) -> MockupResult<Self> {
        customizations.validate()?;

        tracing::debug!(stage = %Stage::Decode, "decoding sources");
        let template = decode_raster(template_bytes, "template")?;
        let logo = decode_raster(logo_bytes, "logo")?;
        Ok(Self {
            logo,
            template,
            customizations,
        })
    }

    /// Template dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.template.width(),
            height: self.template.height(),
        }
    }
}

/// Encoded render and thumbnail, ready to upload.
#[derive(Clone, Debug)]
pub struct CompositeResult {
    /// Full-size render bytes.
    pub render: Vec<u8>,
    /// Encoding of `render`.
    pub render_format: OutputFormat,
    /// Render dimensions, always the template's.
    pub render_size: (u32, u32),
    /// Thumbnail bytes.
    pub thumbnail: Vec<u8>,
    /// Encoding of `thumbnail`.
    pub thumbnail_format: OutputFormat,
    /// Thumbnail dimensions.
    pub thumbnail_size: (u32, u32),
}

/// Synchronous compositing pipeline: decode, place the logo, draw text, encode.
#[derive(Debug, Default)]
pub struct Renderer {
    settings: RenderSettings,
    text: TextRenderer,
}

impl Renderer {
    /// Renderer with explicit settings and text renderer.
    pub fn new(settings: RenderSettings, text: TextRenderer) -> Self {
        Self { settings, text }
    }

    /// Active encodings and thumbnail bound.
    pub fn settings(&self) -> RenderSettings {
        self.settings
    }

    /// Composite the logo and optional text onto the template, returning the raw canvas.
    pub fn composite(&self, request: MockupRequest) -> MockupResult<Raster> {
        let canvas = request.canvas();
        let MockupRequest {
            logo,
            template,
            customizations,
        } = request;
        let resolved = resolve_layer(canvas, logo.width(), logo.height(), &customizations);

        tracing::debug!(stage = %Stage::Composite, "compositing logo");
        let mut out = composite_logo(template, logo, &resolved, &customizations)?;

        if let Some(options) = customizations.text_options() {
            tracing::debug!(stage = %Stage::Text, "rendering text overlay");
            self.text.render_overlay(&mut out, &options)?;
        }
        Ok(out)
    }

    /// Full render: composite, derive the thumbnail from the in-memory result, encode both.
    #[tracing::instrument(skip_all)]
    pub fn render_mockup(
        &self,
        logo_bytes: &[u8],
        template_bytes: &[u8],
        customizations: &Customizations,
    ) -> MockupResult<CompositeResult> {
        self.settings.render_format.validate()?;
        self.settings.thumbnail_format.validate()?;

        let request = MockupRequest::decode(logo_bytes, template_bytes, customizations.clone())?;
        let out = self.composite(request)?;
        let thumb = make_thumbnail(&out, self.settings.thumbnail_max)?;

        tracing::debug!(stage = %Stage::Package, "encoding artifacts");
        Ok(CompositeResult {
            render: encode_raster(&out, self.settings.render_format)?,
            render_format: self.settings.render_format,
            render_size: (out.width(), out.height()),
            thumbnail: encode_raster(&thumb, self.settings.thumbnail_format)?,
            thumbnail_format: self.settings.thumbnail_format,
            thumbnail_size: (thumb.width(), thumb.height()),
        })
    }
}

/// Size that fits `width x height` inside a `max x max` box, keeping the aspect ratio.
///
/// Images already inside the box are never upscaled.
pub fn thumbnail_size(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }
    let s = (f64::from(max) / f64::from(width)).min(f64::from(max) / f64::from(height));
    let fit = |v: u32| ((f64::from(v) * s).round().max(1.0) as u32).min(max.max(1));
    (fit(width), fit(height))
}

/// Lanczos3 thumbnail bounded by `max`.
pub fn make_thumbnail(raster: &Raster, max: u32) -> MockupResult<Raster> {
    let (w, h) = thumbnail_size(raster.width(), raster.height(), max);
    resize_layer(raster.clone(), w, h)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
