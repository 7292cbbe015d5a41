/// Convenience result type used across the worker.
pub type MockupResult<T> = Result<T, MockupError>;

/// Pipeline stage recorded on log events and failed job reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Job input parsing and customization validation.
    Validate,
    /// Fetching logo/template bytes.
    Fetch,
    /// Decoding source rasters.
    Decode,
    /// Layer transforms and blend compositing.
    Composite,
    /// Text overlay rendering.
    Text,
    /// Encoding and uploading artifacts.
    Package,
    /// Anything that happened outside a named stage.
    Job,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Validate => "validate",
            Self::Fetch => "fetch",
            Self::Decode => "decode",
            Self::Composite => "composite",
            Self::Text => "text",
            Self::Package => "package",
            Self::Job => "job",
        };
        f.write_str(s)
    }
}

/// Error taxonomy for a single mockup generation.
#[derive(thiserror::Error, Debug)]
pub enum MockupError {
    /// Malformed customization values or job input, rejected before the pipeline runs.
    #[error("validation error: {0}")]
    Validation(String),

    /// Source bytes are not a decodable raster image.
    #[error("image decode error: {0}")]
    ImageDecode(String),

    /// Text clip path data could not be parsed.
    #[error("text clip error: {0}")]
    TextClip(String),

    /// Fetching a source or storing an artifact failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Pixel-level failure while transforming, compositing or encoding.
    #[error("render error: {0}")]
    Render(String),

    /// The job's overall wall-clock budget elapsed.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MockupError {
    /// Build a [`MockupError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MockupError::ImageDecode`] value.
    pub fn image_decode(msg: impl Into<String>) -> Self {
        Self::ImageDecode(msg.into())
    }

    /// Build a [`MockupError::TextClip`] value.
    pub fn text_clip(msg: impl Into<String>) -> Self {
        Self::TextClip(msg.into())
    }

    /// Build a [`MockupError::Storage`] value.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build a [`MockupError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`MockupError::Timeout`] value.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Whether the external queue may schedule another attempt for this failure.
    ///
    /// Storage and timeout failures are transient; bad input and bad images are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Timeout(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
