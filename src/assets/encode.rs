use std::io::Cursor;

use crate::{
    assets::decode::{Raster, raster_to_rgba},
    foundation::error::{MockupError, MockupResult},
};

/// Encoding used for a stored artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase", tag = "format")]
pub enum OutputFormat {
    /// Baseline JPEG at the given quality (1..=100); alpha is dropped.
    Jpeg {
        /// Encoder quality.
        quality: u8,
    },
    /// Lossless PNG with alpha.
    Png,
}

impl OutputFormat {
    /// MIME type handed to the storage collaborator.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Jpeg { .. } => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// File extension used in artifact keys.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg { .. } => "jpg",
            Self::Png => "png",
        }
    }

    /// Reject JPEG qualities outside `1..=100`.
    pub fn validate(self) -> MockupResult<()> {
        match self {
            Self::Jpeg { quality } if !(1..=100).contains(&quality) => Err(
                MockupError::validation(format!("jpeg quality must be 1..=100, got {quality}")),
            ),
            _ => Ok(()),
        }
    }
}

/// Encode a raster into `format`.
#[tracing::instrument(skip(raster), fields(width = raster.width(), height = raster.height()))]
pub fn encode_raster(raster: &Raster, format: OutputFormat) -> MockupResult<Vec<u8>> {
    let rgba = raster_to_rgba(raster)?;
    let mut buf = Vec::new();
    match format {
        OutputFormat::Jpeg { quality } => {
            let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality);
            image::DynamicImage::ImageRgb8(rgb)
                .write_with_encoder(encoder)
                .map_err(|e| MockupError::render(format!("jpeg encode failed: {e}")))?;
        }
        OutputFormat::Png => {
            image::DynamicImage::ImageRgba8(rgba)
                .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
                .map_err(|e| MockupError::render(format!("png encode failed: {e}")))?;
        }
    }
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/encode.rs"]
mod tests;
