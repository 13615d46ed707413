use bannerscan_core::BannerscanError;
use thiserror::Error;

/// Errors from a single page's detection call.
#[derive(Debug, Error)]
pub enum DetectError {
    /// The document is empty or has no parseable structure
    #[error("cannot parse document: {0}")]
    Parse(String),
}

impl From<DetectError> for BannerscanError {
    fn from(err: DetectError) -> Self {
        BannerscanError::Detection(err.to_string())
    }
}

/// Result type for detection operations.
pub type Result<T> = std::result::Result<T, DetectError>;
