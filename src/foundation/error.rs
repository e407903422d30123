/// Convenience result type used across slatecast.
pub type SlatecastResult<T> = Result<T, SlatecastError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum SlatecastError {
    /// Invalid configuration or slide-record data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Every input row was filtered out, so there is nothing to render.
    #[error("no slides to render: all rows were skipped, empty, or barcode-like")]
    NoSlides,

    /// Errors while compositing or typesetting a slide.
    #[error("render error: {0}")]
    Render(String),

    /// Errors from the external encode/decode process.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlatecastError {
    /// Build a [`SlatecastError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SlatecastError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SlatecastError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`SlatecastError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
