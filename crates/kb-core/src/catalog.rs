//! # Catalog Boundary
//!
//! [`CatalogFetch`] is the single-entity fetch interface the resolvers
//! consume. One call issues one request and reports either an envelope or
//! a transport failure. Authentication, transient retry and JSON decoding
//! are the implementor's concern.
//!
//! Implementations must be `Send + Sync` so they can be shared across
//! threads behind an `Arc`. The trait is object-safe.

use crate::envelope::HttpResult;
use crate::identity::ResourceId;
use crate::model::{Component, ComponentVariant, ComponentVersion, License, Priorities};

pub trait CatalogFetch: Send + Sync {
    /// Fetch one component.
    fn fetch_component(&self, id: &ResourceId) -> HttpResult<Component>;

    /// Fetch one component version, summarizing vulnerabilities per `priorities`.
    fn fetch_component_version(
        &self,
        id: &ResourceId,
        priorities: &Priorities,
    ) -> HttpResult<ComponentVersion>;

    /// Fetch one component variant, summarizing vulnerabilities per `priorities`.
    fn fetch_component_variant(
        &self,
        id: &ResourceId,
        priorities: &Priorities,
    ) -> HttpResult<ComponentVariant>;

    /// Fetch one license.
    fn fetch_license(&self, id: &ResourceId) -> HttpResult<License>;
}

impl<C: CatalogFetch + ?Sized> CatalogFetch for &C {
    fn fetch_component(&self, id: &ResourceId) -> HttpResult<Component> {
        (**self).fetch_component(id)
    }

    fn fetch_component_version(
        &self,
        id: &ResourceId,
        priorities: &Priorities,
    ) -> HttpResult<ComponentVersion> {
        (**self).fetch_component_version(id, priorities)
    }

    fn fetch_component_variant(
        &self,
        id: &ResourceId,
        priorities: &Priorities,
    ) -> HttpResult<ComponentVariant> {
        (**self).fetch_component_variant(id, priorities)
    }

    fn fetch_license(&self, id: &ResourceId) -> HttpResult<License> {
        (**self).fetch_license(id)
    }
}

impl<C: CatalogFetch + ?Sized> CatalogFetch for std::sync::Arc<C> {
    fn fetch_component(&self, id: &ResourceId) -> HttpResult<Component> {
        (**self).fetch_component(id)
    }

    fn fetch_component_version(
        &self,
        id: &ResourceId,
        priorities: &Priorities,
    ) -> HttpResult<ComponentVersion> {
        (**self).fetch_component_version(id, priorities)
    }

    fn fetch_component_variant(
        &self,
        id: &ResourceId,
        priorities: &Priorities,
    ) -> HttpResult<ComponentVariant> {
        (**self).fetch_component_variant(id, priorities)
    }

    fn fetch_license(&self, id: &ResourceId) -> HttpResult<License> {
        (**self).fetch_license(id)
    }
}
