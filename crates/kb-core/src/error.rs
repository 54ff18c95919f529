//! # Error Types
//!
//! Errors in this crate are reserved for invariant violations at
//! construction time ([`ValidationError`]) and for the opaque transport
//! failure cause a fetch may report ([`TransportError`]).
//!
//! Routine resolution outcomes (absence, bound exhaustion, malformed
//! migration links) are never errors. They are modeled as data in
//! [`crate::Resolution`] and [`crate::MigratableResult`].

use thiserror::Error;

/// A value failed validation at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The string is not a valid resource identifier.
    #[error("invalid resource id: {0:?}")]
    InvalidResourceId(String),

    /// A boolean join needs at least two children.
    #[error("license join requires at least 2 children, got {children}")]
    DegenerateJoin {
        /// Number of children supplied.
        children: usize,
    },
}

/// A fetch could not complete its exchange with the catalog.
///
/// Carried as data on [`crate::MigratableResult`] for logging. It is
/// `Clone` so results holding it stay cheap to pass around.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection could not be established or was reset.
    #[error("connection to {endpoint} failed: {reason}")]
    Connect {
        /// The endpoint that was called.
        endpoint: String,
        /// Human-readable cause.
        reason: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("request to {endpoint} timed out")]
    Timeout {
        /// The endpoint that was called.
        endpoint: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response from {endpoint}: {reason}")]
    Decode {
        /// The endpoint that was called.
        endpoint: String,
        /// Human-readable cause.
        reason: String,
    },

    /// No async runtime was available to drive the request.
    #[error("transport runtime unavailable: {reason}")]
    Runtime {
        /// Human-readable cause.
        reason: String,
    },
}
