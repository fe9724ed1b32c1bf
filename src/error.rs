use thiserror::Error;

/// Fatal export failures. Layout problems never end up here; they are
/// reported through [`crate::LayoutWarnings`].
#[derive(Debug, Error)]
pub enum CardPressError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("pdf serialization failed: {0}")]
    Pdf(String),
    #[error("settings could not be read or written")]
    Config(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CardPressError {
    pub(crate) fn pdf(err: impl std::fmt::Display) -> Self {
        CardPressError::Pdf(err.to_string())
    }
}
