//! # kb-core — Foundational Types for the KB Resolution Layer
//!
//! Defines the data model shared by the resolvers and the transport layer
//! that sits beneath them. `kb-core` depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype identifiers.** Every catalog entity is addressed by a
//!    [`ResourceId`]. No bare UUIDs or strings cross crate boundaries.
//!
//! 2. **Envelopes are data.** [`ResultEnvelope`] records the outcome of one
//!    exchange with the catalog. Absence and migration are values, not
//!    errors. A payload and a migration signal never coexist.
//!
//! 3. **Tagged outcomes.** Resolutions end in [`Resolution`] or
//!    [`MigratableResult`], which distinguish "resolved", "absent" and
//!    "bound exhausted" without exceptions.
//!
//! 4. **Validated trees.** A [`LicenseJoin`] with fewer than two children
//!    cannot be constructed.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `kb-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod catalog;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod hierarchy;
pub mod identity;
pub mod license;
pub mod link;
pub mod model;
pub mod outcome;

// Re-export primary types for ergonomic imports.
pub use catalog::CatalogFetch;
pub use envelope::{
    HttpResult, MigratableResult, MigratableResultEnvelope, MigrationOutcome, Request,
    RequestMethod, ResultEnvelope,
};
pub use error::{TransportError, ValidationError};
pub use extract::extract_id;
pub use hierarchy::{ComponentHierarchy, VariantHierarchy};
pub use identity::{ResourceId, ResourceKind};
pub use license::{JoinType, LicenseDefinitionNode, LicenseJoin};
pub use link::{Link, LinkRelation, Meta, MigrationKind};
pub use model::{
    Component, ComponentVariant, ComponentVersion, License, LicenseDefinitionItem,
    LicenseDefinitionSource, Priorities, VulnerabilityScorePriority,
    VulnerabilitySourcePriority,
};
pub use outcome::Resolution;
