//! User-supplied transform and style parameters.
//!
//! The wire form is the flat camelCase object sent by the job queue; every field is
//! optional. Accessors apply the per-field defaults, and [`Customizations::validate`] enforces
//! the accepted ranges before a job enters the render pipeline.

use crate::{
    foundation::core::{Canvas, Point, Rgb8},
    foundation::error::{MockupError, MockupResult},
    model::blend::BlendMode,
};

/// Default logo size as a fraction of the template's shorter side.
pub const DEFAULT_SCALE: f64 = 0.3;
/// Smallest scale accepted at the validation boundary.
pub const MIN_SCALE: f64 = 0.1;
/// Largest accepted scale.
pub const MAX_SCALE: f64 = 3.0;
/// Default font family for text overlays.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";
/// Default font size in pixels.
pub const DEFAULT_FONT_SIZE: f64 = 24.0;
/// Largest accepted font size in pixels.
pub const MAX_FONT_SIZE: f64 = 2_000.0;
/// Default text fill.
pub const DEFAULT_TEXT_COLOR: Rgb8 = Rgb8::new(0, 0, 0);

/// Centre of the logo in template pixel space.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Position {
    /// Horizontal centre.
    pub x: f64,
    /// Vertical centre.
    pub y: f64,
}

impl From<Position> for Point {
    fn from(p: Position) -> Self {
        Point::new(p.x, p.y)
    }
}

/// Whether text is clipped to a user path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextClipping {
    /// Plain text strip centred on the canvas.
    #[default]
    #[serde(alias = "NONE")]
    None,
    /// Text clipped to the silhouette of `textPath`.
    #[serde(alias = "PATH")]
    Path,
}

/// Horizontal text alignment inside the text layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Text starts at the left edge.
    Left,
    /// Text is centred.
    #[default]
    Center,
    /// Text ends at the right edge.
    Right,
}

/// Raw customization object as received from the job queue.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customizations {
    /// Logo centre; defaults to the template centre.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Fraction of the template's shorter side; defaults to [`DEFAULT_SCALE`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    /// Degrees, clockwise; defaults to 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// Layer opacity in `[0, 1]`; defaults to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Compositing operator; defaults to [`BlendMode::Over`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
    /// Colour applied to non-transparent logo pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tint: Option<Rgb8>,
    /// Convert the logo to grayscale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grayscale: Option<bool>,
    /// Overlay text; an empty string disables the overlay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Font family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Font size in pixels, at least 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Text fill colour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Rgb8>,
    /// Clipping mode for the text layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_clipping: Option<TextClipping>,
    /// SVG path data used when clipping is [`TextClipping::Path`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_path: Option<String>,
    /// Horizontal alignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    /// Outline colour; the outline is drawn only when a positive width is set too.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_stroke_color: Option<Rgb8>,
    /// Outline width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_stroke_width: Option<f64>,
}

/// Text outline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStroke {
    /// Outline colour.
    pub color: Rgb8,
    /// Outline width in pixels, always positive.
    pub width: f64,
}

/// How the text layer is bounded.
#[derive(Clone, Debug, PartialEq)]
pub enum TextLayout {
    /// A full-width strip `1.5 * font_size` tall, centred on the canvas.
    Strip,
    /// A full-canvas layer clipped to the given SVG path data.
    ClipPath(String),
}

/// Text overlay parameters with defaults applied.
#[derive(Clone, Debug, PartialEq)]
pub struct TextOptions {
    /// Non-empty text content.
    pub text: String,
    /// Font family name.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Fill colour.
    pub color: Rgb8,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Optional outline.
    pub stroke: Option<TextStroke>,
    /// Bounding mode.
    pub layout: TextLayout,
}

impl Customizations {
    /// Parse the JSON customization object; malformed values are validation errors.
    pub fn from_json_value(value: serde_json::Value) -> MockupResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| MockupError::validation(format!("invalid customizations: {e}")))
    }

    /// Logo centre, defaulting to the canvas centre.
    pub fn position_or_center(&self, canvas: Canvas) -> Point {
        self.position.map(Point::from).unwrap_or_else(|| canvas.center())
    }

    /// Scale with default applied.
    pub fn scale(&self) -> f64 {
        self.scale.unwrap_or(DEFAULT_SCALE)
    }

    /// Rotation in degrees with default applied.
    pub fn rotation(&self) -> f64 {
        self.rotation.unwrap_or(0.0)
    }

    /// Opacity with default applied.
    pub fn opacity(&self) -> f64 {
        self.opacity.unwrap_or(1.0)
    }

    /// Blend mode with default applied.
    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode.unwrap_or_default()
    }

    /// Grayscale flag with default applied.
    pub fn grayscale(&self) -> bool {
        self.grayscale.unwrap_or(false)
    }

    /// Resolved text overlay, or `None` when no text was requested.
    ///
    /// Path clipping is selected only when a path is present; without one the layer falls back
    /// to a strip.
    pub fn text_options(&self) -> Option<TextOptions> {
        let text = self.text.as_deref().filter(|t| !t.is_empty())?;

        let stroke_width = self.text_stroke_width.unwrap_or(0.0);
        let stroke = match self.text_stroke_color {
            Some(color) if stroke_width > 0.0 => Some(TextStroke {
                color,
                width: stroke_width,
            }),
            _ => None,
        };

        let layout = match (self.text_clipping.unwrap_or_default(), &self.text_path) {
            (TextClipping::Path, Some(path)) => TextLayout::ClipPath(path.clone()),
            _ => TextLayout::Strip,
        };

        Some(TextOptions {
            text: text.to_owned(),
            font_family: self
                .font_family
                .clone()
                .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_owned()),
            font_size: self.font_size.unwrap_or(DEFAULT_FONT_SIZE),
            color: self.text_color.unwrap_or(DEFAULT_TEXT_COLOR),
            align: self.text_align.unwrap_or_default(),
            stroke,
            layout,
        })
    }

    /// Reject values outside the accepted ranges.
    pub fn validate(&self) -> MockupResult<()> {
        if let Some(p) = self.position {
            finite("position.x", p.x)?;
            finite("position.y", p.y)?;
        }
        if let Some(v) = self.scale {
            in_range("scale", v, MIN_SCALE, MAX_SCALE)?;
        }
        if let Some(v) = self.rotation {
            in_range("rotation", v, -180.0, 180.0)?;
        }
        if let Some(v) = self.opacity {
            in_range("opacity", v, 0.0, 1.0)?;
        }
        if let Some(v) = self.font_size {
            in_range("fontSize", v, 1.0, MAX_FONT_SIZE)?;
        }
        if let Some(v) = self.text_stroke_width {
            at_least("textStrokeWidth", v, 0.0)?;
        }
        if let Some(family) = &self.font_family
            && family.trim().is_empty()
        {
            return Err(MockupError::validation("fontFamily must not be empty"));
        }
        if self.text_clipping == Some(TextClipping::Path)
            && self.text_path.as_deref().is_none_or(|p| p.trim().is_empty())
        {
            return Err(MockupError::validation(
                "textPath is required when textClipping is \"path\"",
            ));
        }
        Ok(())
    }
}

fn finite(field: &str, v: f64) -> MockupResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(MockupError::validation(format!("{field} must be finite")))
    }
}

fn in_range(field: &str, v: f64, min: f64, max: f64) -> MockupResult<()> {
    finite(field, v)?;
    if v < min || v > max {
        return Err(MockupError::validation(format!(
            "{field} must be within [{min}, {max}], got {v}"
        )));
    }
    Ok(())
}

fn at_least(field: &str, v: f64, min: f64) -> MockupResult<()> {
    finite(field, v)?;
    if v < min {
        return Err(MockupError::validation(format!(
            "{field} must be at least {min}, got {v}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/model/customizations.rs"]
mod tests;
