//! KB client construction errors.
//!
//! Failures of individual fetches are not errors of this type: they are
//! reported as [`kb_core::TransportError`] inside the returned
//! [`kb_core::HttpResult`].

/// Errors building a [`crate::HttpCatalog`].
#[derive(Debug, thiserror::Error)]
pub enum KbClientError {
    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {source}")]
    Http { source: reqwest::Error },
    /// The API token cannot be sent as a header value.
    #[error("API token contains characters not allowed in an HTTP header")]
    InvalidToken,
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}
