//! # kb-client — HTTP Transport for the KB Catalog
//!
//! Implements [`kb_core::CatalogFetch`] over `reqwest`: one GET per fetch,
//! bearer authentication, transient-failure retry with exponential
//! backoff, and a fixed mapping from HTTP status to
//! [`kb_core::ResultEnvelope`].
//!
//! Resolution policy (migration chasing, hierarchy consistency, license
//! hydration) lives in `kb-resolver`, which consumes this crate only
//! through the `CatalogFetch` trait.
//!
//! ## API Path Convention
//!
//! `{base_url}/api/{components|versions|variants|licenses}/{id}`. Version
//! and variant fetches add `vulnerabilitySourcePriority` and
//! `vulnerabilityScorePriority` query parameters.

pub mod catalog;
pub mod config;
pub mod error;
pub(crate) mod retry;

pub use catalog::HttpCatalog;
pub use config::{ConfigError, KbClientConfig};
pub use error::KbClientError;
