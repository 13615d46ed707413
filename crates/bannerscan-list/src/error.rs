//! Error types for banner list handling.

use bannerscan_core::BannerscanError;
use thiserror::Error;

/// Errors that can occur while retrieving or loading the banner list.
///
/// Any of these aborts list loading entirely; no partially-loaded table is
/// ever returned.
#[derive(Error, Debug)]
pub enum ListError {
    /// Transport failure while retrieving the list
    #[error("failed to fetch banner list from {url}: {reason}")]
    Network {
        /// Remote location of the list
        url: String,
        /// Underlying transport or HTTP status failure
        reason: String,
    },

    /// The list could not be read or lacks a reserved section
    #[error("invalid banner list {path}: {reason}")]
    Format {
        /// Source of the list (file path or `<inline>`)
        path: String,
        /// Reason the list was rejected
        reason: String,
    },

    /// I/O error while storing a fetched list
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ListError> for BannerscanError {
    fn from(err: ListError) -> Self {
        match err {
            ListError::Io(e) => BannerscanError::Io(e),
            other => BannerscanError::List(other.to_string()),
        }
    }
}

/// Result type for banner list operations.
pub type Result<T> = std::result::Result<T, ListError>;
