//! # kb-resolver — Resolution Layer over the KB Catalog
//!
//! Turns single-entity catalog fetches into trustworthy answers:
//!
//! - [`migration`]: follows `moved` links from a requested id to its stable
//!   destination, recording the history of every hop.
//! - [`hierarchy`]: reads component → version (→ variant) chains and
//!   restarts whenever a migration between reads leaves the chain
//!   inconsistent.
//! - [`license`]: hydrates license definition trees into fetched licenses.
//!
//! Every recursive resolution is bounded (see [`config`]). Resolvers hold
//! no mutable state and may be shared across threads.
//!
//! ## Usage
//!
//! ```
//! use kb_core::{Priorities, ResourceId};
//! use kb_resolver::stub::{component, version, StubCatalog, StubResponse};
//! use kb_resolver::{KbResolver, ResolverConfig};
//!
//! let catalog = StubCatalog::new();
//! let (version_id, component_id) = (ResourceId::new(), ResourceId::new());
//! catalog
//!     .on_version(version_id, StubResponse::Found(version(version_id, component_id)))
//!     .on_component(component_id, StubResponse::Found(component(component_id)));
//!
//! let resolver = KbResolver::new(catalog, ResolverConfig::default()).unwrap();
//! let hierarchy = resolver
//!     .resolve_component_hierarchy(&version_id, &Priorities::default())
//!     .into_option()
//!     .unwrap();
//! assert!(hierarchy.is_complete());
//! ```

pub mod config;
pub mod hierarchy;
pub mod license;
pub mod migration;
pub mod stub;

pub use config::{ConfigError, ResolverConfig};
pub use hierarchy::HierarchyResolver;
pub use license::LicenseDefinitionResolver;
pub use migration::{resolve_migratable, MigrationResolver};

use kb_core::{
    CatalogFetch, ComponentHierarchy, HttpResult, LicenseDefinitionNode, LicenseDefinitionSource,
    MigratableResult, Priorities, Resolution, ResourceId, ResourceKind, VariantHierarchy,
};

/// A catalog paired with validated resolver bounds.
#[derive(Debug)]
pub struct KbResolver<C> {
    catalog: C,
    config: ResolverConfig,
    migration: MigrationResolver,
    hierarchy: HierarchyResolver,
    license: LicenseDefinitionResolver,
}

impl<C: CatalogFetch> KbResolver<C> {
    /// Build a resolver. Fails if any bound in `config` is zero.
    pub fn new(catalog: C, config: ResolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let migration = MigrationResolver::new(config.migration_max_attempts);
        Ok(Self {
            catalog,
            config,
            migration,
            hierarchy: HierarchyResolver::new(migration, config.hierarchy_max_attempts),
            license: LicenseDefinitionResolver::new(migration, config.license_max_depth),
        })
    }

    /// Build a resolver with bounds read from the environment.
    pub fn from_env(catalog: C) -> Result<Self, ConfigError> {
        Self::new(catalog, ResolverConfig::from_env()?)
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a version and its parent component as a consistent pair.
    pub fn resolve_component_hierarchy(
        &self,
        version_id: &ResourceId,
        priorities: &Priorities,
    ) -> Resolution<ComponentHierarchy> {
        self.hierarchy
            .resolve_version_hierarchy(&self.catalog, version_id, priorities)
    }

    /// Resolve a variant, its version and its component as a consistent triple.
    pub fn resolve_variant_hierarchy(
        &self,
        variant_id: &ResourceId,
        priorities: &Priorities,
    ) -> Resolution<VariantHierarchy> {
        self.hierarchy
            .resolve_variant_hierarchy(&self.catalog, variant_id, priorities)
    }

    /// Hydrate a license definition into a tree of fetched licenses.
    pub fn resolve_license_definition(
        &self,
        source: &LicenseDefinitionSource,
    ) -> Resolution<LicenseDefinitionNode> {
        self.license.resolve(&self.catalog, source)
    }

    /// Chase migrations for an arbitrary fetch using this resolver's bound.
    pub fn resolve_migratable<S, T, F, M>(
        &self,
        id: &ResourceId,
        fetch: F,
        convert: M,
        kind: ResourceKind,
    ) -> MigratableResult<T>
    where
        F: Fn(&ResourceId) -> HttpResult<S>,
        M: Fn(S) -> T,
    {
        self.migration.resolve(id, fetch, convert, kind)
    }
}
