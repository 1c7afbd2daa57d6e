//! Error types

use crate::store::StoreError;

/// Errors produced while fetching or resolving page configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("unexpected status {0} from CMS")]
    Status(u16),

    #[error("malformed CMS response: {0}")]
    Shape(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("not found")]
    NotFound,
}
