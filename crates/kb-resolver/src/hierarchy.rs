//! # Hierarchy Resolver
//!
//! Reads a component → version (→ variant) chain as one consistent
//! snapshot, even though the catalog offers no atomic multi-entity read.
//!
//! Each level is resolved independently through the [`MigrationResolver`].
//! A migration landing between two of those fetches can leave the child
//! pointing at a parent id that no longer names the resolved parent. When
//! that is detected the whole chain is restarted from the original leaf id,
//! re-fetching the child too. After `max_attempts` passes without a
//! consistent snapshot the resolver fails closed with
//! [`Resolution::BoundExhausted`].
//!
//! ```text
//! version ──componentId──▶ component
//!    ▲                        │
//!    └── restart if component.id ≠ componentId
//! ```

use std::convert::identity;

use kb_core::{
    CatalogFetch, ComponentHierarchy, Priorities, Resolution, ResourceId, ResourceKind,
    VariantHierarchy,
};
use tracing::{debug, warn};

use crate::config::DEFAULT_HIERARCHY_MAX_ATTEMPTS;
use crate::migration::MigrationResolver;

/// Result of one pass over the chain.
#[derive(Debug)]
enum Pass<T> {
    /// Every level resolved and agrees with its parent.
    Consistent(T),
    /// A parent reference disagrees with the resolved parent.
    Stale,
    /// Some level has no payload.
    Absent,
}

/// Resolves consistent multi-level hierarchies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyResolver {
    migration: MigrationResolver,
    max_attempts: u32,
}

impl Default for HierarchyResolver {
    fn default() -> Self {
        Self::new(MigrationResolver::default(), DEFAULT_HIERARCHY_MAX_ATTEMPTS)
    }
}

impl HierarchyResolver {
    pub fn new(migration: MigrationResolver, max_attempts: u32) -> Self {
        Self {
            migration,
            max_attempts,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Resolve a version together with its parent component.
    pub fn resolve_version_hierarchy<C>(
        &self,
        catalog: &C,
        version_id: &ResourceId,
        priorities: &Priorities,
    ) -> Resolution<ComponentHierarchy>
    where
        C: CatalogFetch + ?Sized,
    {
        self.version_hierarchy_at(catalog, version_id, priorities, 1)
    }

    /// Resolve a variant together with its parent version and component.
    pub fn resolve_variant_hierarchy<C>(
        &self,
        catalog: &C,
        variant_id: &ResourceId,
        priorities: &Priorities,
    ) -> Resolution<VariantHierarchy>
    where
        C: CatalogFetch + ?Sized,
    {
        self.variant_hierarchy_at(catalog, variant_id, priorities, 1)
    }

    fn version_hierarchy_at<C>(
        &self,
        catalog: &C,
        version_id: &ResourceId,
        priorities: &Priorities,
        attempt: u32,
    ) -> Resolution<ComponentHierarchy>
    where
        C: CatalogFetch + ?Sized,
    {
        if attempt > self.max_attempts {
            warn!(
                %version_id,
                max_attempts = self.max_attempts,
                "version hierarchy still inconsistent after attempt bound"
            );
            return Resolution::BoundExhausted;
        }

        match self.version_pass(catalog, version_id, priorities) {
            Pass::Consistent(hierarchy) => Resolution::Resolved(hierarchy),
            Pass::Absent => Resolution::Absent,
            Pass::Stale => {
                warn!(%version_id, attempt, "inconsistent version hierarchy, restarting");
                self.version_hierarchy_at(catalog, version_id, priorities, attempt + 1)
            }
        }
    }

    fn variant_hierarchy_at<C>(
        &self,
        catalog: &C,
        variant_id: &ResourceId,
        priorities: &Priorities,
        attempt: u32,
    ) -> Resolution<VariantHierarchy>
    where
        C: CatalogFetch + ?Sized,
    {
        if attempt > self.max_attempts {
            warn!(
                %variant_id,
                max_attempts = self.max_attempts,
                "variant hierarchy still inconsistent after attempt bound"
            );
            return Resolution::BoundExhausted;
        }

        match self.variant_pass(catalog, variant_id, priorities) {
            Pass::Consistent(hierarchy) => Resolution::Resolved(hierarchy),
            Pass::Absent => Resolution::Absent,
            Pass::Stale => {
                warn!(%variant_id, attempt, "inconsistent variant hierarchy, restarting");
                self.variant_hierarchy_at(catalog, variant_id, priorities, attempt + 1)
            }
        }
    }

    fn version_pass<C>(
        &self,
        catalog: &C,
        version_id: &ResourceId,
        priorities: &Priorities,
    ) -> Pass<ComponentHierarchy>
    where
        C: CatalogFetch + ?Sized,
    {
        let version = self.migration.resolve(
            version_id,
            |id: &ResourceId| catalog.fetch_component_version(id, priorities),
            identity,
            ResourceKind::Version,
        );
        let Some(source_component_id) = version.payload().map(|v| v.component_id) else {
            debug!(%version_id, "version has no payload");
            return Pass::Absent;
        };

        let component = self.migration.resolve(
            &source_component_id,
            |id: &ResourceId| catalog.fetch_component(id),
            identity,
            ResourceKind::Component,
        );
        let Some(destination_component_id) = component.payload().map(|c| c.id) else {
            debug!(%version_id, component_id = %source_component_id, "component has no payload");
            return Pass::Absent;
        };

        if destination_component_id != source_component_id {
            debug!(
                %version_id,
                requested = %source_component_id,
                resolved = %destination_component_id,
                "component migrated between reads"
            );
            return Pass::Stale;
        }

        Pass::Consistent(ComponentHierarchy::new(component, version))
    }

    fn variant_pass<C>(
        &self,
        catalog: &C,
        variant_id: &ResourceId,
        priorities: &Priorities,
    ) -> Pass<VariantHierarchy>
    where
        C: CatalogFetch + ?Sized,
    {
        let variant = self.migration.resolve(
            variant_id,
            |id: &ResourceId| catalog.fetch_component_variant(id, priorities),
            identity,
            ResourceKind::Variant,
        );
        let Some(source_version_id) = variant.payload().map(|v| v.version_id) else {
            debug!(%variant_id, "variant has no payload");
            return Pass::Absent;
        };

        let hierarchy = match self.version_pass(catalog, &source_version_id, priorities) {
            Pass::Consistent(hierarchy) => hierarchy,
            Pass::Stale => return Pass::Stale,
            Pass::Absent => return Pass::Absent,
        };

        let destination_version_id = hierarchy.version().payload().map(|v| v.id);
        if destination_version_id != Some(source_version_id) {
            debug!(
                %variant_id,
                requested = %source_version_id,
                resolved = ?destination_version_id,
                "version migrated between reads"
            );
            return Pass::Stale;
        }

        Pass::Consistent(VariantHierarchy::new(hierarchy, variant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::{component, variant, version, StubCatalog, StubResponse};

    fn resolver() -> HierarchyResolver {
        HierarchyResolver::default()
    }

    #[test]
    fn consistent_pair_resolves_on_first_pass() {
        let stub = StubCatalog::new();
        let (v, c) = (ResourceId::new(), ResourceId::new());
        stub.on_version(v, StubResponse::Found(version(v, c)))
            .on_component(c, StubResponse::Found(component(c)));

        let hierarchy = resolver()
            .resolve_version_hierarchy(&stub, &v, &Priorities::default())
            .into_option()
            .unwrap();
        assert!(hierarchy.is_complete());
        assert_eq!(hierarchy.component().payload().unwrap().id, c);
        assert_eq!(stub.total_calls(), 2);
    }

    #[test]
    fn component_migrated_between_reads_restarts_from_version() {
        let stub = StubCatalog::new();
        let (v, p1, p2) = (ResourceId::new(), ResourceId::new(), ResourceId::new());
        // First pass: version still points at P1, which has merged into P2.
        // Second pass: version has been updated to point at P2.
        stub.on_version(v, StubResponse::Found(version(v, p1)))
            .on_version(v, StubResponse::Found(version(v, p2)))
            .on_component(p1, StubResponse::Moved(vec![p2]))
            .on_component(p2, StubResponse::Found(component(p2)));

        let hierarchy = resolver()
            .resolve_version_hierarchy(&stub, &v, &Priorities::default())
            .into_option()
            .unwrap();
        assert_eq!(stub.call_count(ResourceKind::Version, &v), 2);
        assert_eq!(hierarchy.version().payload().unwrap().component_id, p2);
        assert_eq!(hierarchy.component().payload().unwrap().id, p2);
        assert!(hierarchy.component().history().is_empty());
    }

    #[test]
    fn persistent_inconsistency_is_bound_exhausted() {
        let stub = StubCatalog::new();
        let (v, p1, p2) = (ResourceId::new(), ResourceId::new(), ResourceId::new());
        stub.on_version(v, StubResponse::Found(version(v, p1)))
            .on_component(p1, StubResponse::Moved(vec![p2]))
            .on_component(p2, StubResponse::Found(component(p2)));

        let result = resolver().resolve_version_hierarchy(&stub, &v, &Priorities::default());
        assert_eq!(result, Resolution::BoundExhausted);
        assert_eq!(
            stub.call_count(ResourceKind::Version, &v),
            DEFAULT_HIERARCHY_MAX_ATTEMPTS as usize
        );
    }

    #[test]
    fn missing_version_is_absent_without_component_fetch() {
        let stub = StubCatalog::new();
        let v = ResourceId::new();
        stub.on_version(v, StubResponse::Missing(404));

        let result = resolver().resolve_version_hierarchy(&stub, &v, &Priorities::default());
        assert_eq!(result, Resolution::Absent);
        assert_eq!(stub.total_calls(), 1);
    }

    #[test]
    fn missing_component_is_absent() {
        let stub = StubCatalog::new();
        let (v, c) = (ResourceId::new(), ResourceId::new());
        stub.on_version(v, StubResponse::Found(version(v, c)))
            .on_component(c, StubResponse::Missing(403));

        let result = resolver().resolve_version_hierarchy(&stub, &v, &Priorities::default());
        assert_eq!(result, Resolution::Absent);
    }

    #[test]
    fn transport_failure_is_absent() {
        let stub = StubCatalog::new();
        let v = ResourceId::new();
        stub.on_version(v, StubResponse::Fail);

        let result = resolver().resolve_version_hierarchy(&stub, &v, &Priorities::default());
        assert_eq!(result, Resolution::Absent);
    }

    #[test]
    fn migrated_version_is_followed_without_restart() {
        let stub = StubCatalog::new();
        let (v_old, v_new, c) = (ResourceId::new(), ResourceId::new(), ResourceId::new());
        stub.on_version(v_old, StubResponse::Moved(vec![v_new]))
            .on_version(v_new, StubResponse::Found(version(v_new, c)))
            .on_component(c, StubResponse::Found(component(c)));

        let hierarchy = resolver()
            .resolve_version_hierarchy(&stub, &v_old, &Priorities::default())
            .into_option()
            .unwrap();
        assert_eq!(hierarchy.version().payload().unwrap().id, v_new);
        assert_eq!(hierarchy.version().history().len(), 1);
        assert_eq!(stub.call_count(ResourceKind::Version, &v_old), 1);
    }

    #[test]
    fn variant_hierarchy_resolves_three_levels() {
        let stub = StubCatalog::new();
        let (x, v, c) = (ResourceId::new(), ResourceId::new(), ResourceId::new());
        stub.on_variant(x, StubResponse::Found(variant(x, v, c)))
            .on_version(v, StubResponse::Found(version(v, c)))
            .on_component(c, StubResponse::Found(component(c)));

        let triple = resolver()
            .resolve_variant_hierarchy(&stub, &x, &Priorities::default())
            .into_option()
            .unwrap();
        assert!(triple.is_complete());
        assert_eq!(triple.variant().payload().unwrap().id, x);
        assert_eq!(triple.version().payload().unwrap().id, v);
        assert_eq!(triple.component().payload().unwrap().id, c);
    }

    #[test]
    fn version_migrated_under_variant_restarts_from_variant() {
        let stub = StubCatalog::new();
        let (x, v1, v2, c) = (
            ResourceId::new(),
            ResourceId::new(),
            ResourceId::new(),
            ResourceId::new(),
        );
        stub.on_variant(x, StubResponse::Found(variant(x, v1, c)))
            .on_variant(x, StubResponse::Found(variant(x, v2, c)))
            .on_version(v1, StubResponse::Moved(vec![v2]))
            .on_version(v2, StubResponse::Found(version(v2, c)))
            .on_component(c, StubResponse::Found(component(c)));

        let triple = resolver()
            .resolve_variant_hierarchy(&stub, &x, &Priorities::default())
            .into_option()
            .unwrap();
        assert_eq!(stub.call_count(ResourceKind::Variant, &x), 2);
        assert_eq!(triple.variant().payload().unwrap().version_id, v2);
        assert_eq!(triple.version().payload().unwrap().id, v2);
    }

    #[test]
    fn component_inconsistency_restarts_whole_variant_chain() {
        let stub = StubCatalog::new();
        let (x, v, p1, p2) = (
            ResourceId::new(),
            ResourceId::new(),
            ResourceId::new(),
            ResourceId::new(),
        );
        stub.on_variant(x, StubResponse::Found(variant(x, v, p1)))
            .on_version(v, StubResponse::Found(version(v, p1)))
            .on_version(v, StubResponse::Found(version(v, p2)))
            .on_component(p1, StubResponse::Moved(vec![p2]))
            .on_component(p2, StubResponse::Found(component(p2)));

        let triple = resolver()
            .resolve_variant_hierarchy(&stub, &x, &Priorities::default())
            .into_option()
            .unwrap();
        assert_eq!(stub.call_count(ResourceKind::Variant, &x), 2);
        assert_eq!(triple.component().payload().unwrap().id, p2);
    }

    #[test]
    fn stale_variant_reference_is_bound_exhausted() {
        let stub = StubCatalog::new();
        let (x, v1, v2, c) = (
            ResourceId::new(),
            ResourceId::new(),
            ResourceId::new(),
            ResourceId::new(),
        );
        stub.on_variant(x, StubResponse::Found(variant(x, v1, c)))
            .on_version(v1, StubResponse::Moved(vec![v2]))
            .on_version(v2, StubResponse::Found(version(v2, c)))
            .on_component(c, StubResponse::Found(component(c)));

        let result = HierarchyResolver::new(MigrationResolver::default(), 2)
            .resolve_variant_hierarchy(&stub, &x, &Priorities::default());
        assert_eq!(result, Resolution::BoundExhausted);
        assert_eq!(stub.call_count(ResourceKind::Variant, &x), 2);
    }

    #[test]
    fn missing_variant_is_absent() {
        let stub = StubCatalog::new();
        let x = ResourceId::new();

        let result = resolver().resolve_variant_hierarchy(&stub, &x, &Priorities::default());
        assert_eq!(result, Resolution::Absent);
        assert_eq!(stub.total_calls(), 1);
    }
}
