//! Catalog fetch errors

use thiserror::Error;

/// Failure to obtain a collection from the catalog data source.
///
/// `Clone` because one outcome is handed to every consumer that joined the
/// same in-flight request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP error: {0}")]
    Status(u16),
    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Malformed(err.to_string())
    }
}
