//! # License Definition Resolver
//!
//! Hydrates a [`LicenseDefinitionSource`] (a tree of license id references
//! and nested sub-definitions) into a [`LicenseDefinitionNode`] tree of
//! fetched licenses.
//!
//! Rules, applied bottom-up:
//!
//! - A license reference is fetched through the [`MigrationResolver`]. No
//!   payload at the end of the chain makes the whole definition `Absent`.
//! - A nested definition recurses one level deeper. Anything other than
//!   `Resolved` propagates unchanged.
//! - One hydrated child collapses to that child. Two or more become a
//!   [`LicenseJoin`] carrying the source join type.
//! - The first unresolvable item stops the walk; later siblings are never
//!   fetched.
//!
//! Nesting deeper than `max_depth` is refused with
//! [`Resolution::BoundExhausted`] before any fetch at that level.

use std::convert::identity;

use kb_core::{
    CatalogFetch, LicenseDefinitionItem, LicenseDefinitionNode, LicenseDefinitionSource,
    LicenseJoin, Resolution, ResourceId, ResourceKind,
};
use tracing::{debug, warn};

use crate::config::DEFAULT_LICENSE_MAX_DEPTH;
use crate::migration::MigrationResolver;

/// Hydrates license definition trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LicenseDefinitionResolver {
    migration: MigrationResolver,
    max_depth: u32,
}

impl Default for LicenseDefinitionResolver {
    fn default() -> Self {
        Self::new(MigrationResolver::default(), DEFAULT_LICENSE_MAX_DEPTH)
    }
}

impl LicenseDefinitionResolver {
    pub fn new(migration: MigrationResolver, max_depth: u32) -> Self {
        Self {
            migration,
            max_depth,
        }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Hydrate `source` into a license tree.
    pub fn resolve<C>(
        &self,
        catalog: &C,
        source: &LicenseDefinitionSource,
    ) -> Resolution<LicenseDefinitionNode>
    where
        C: CatalogFetch + ?Sized,
    {
        self.resolve_at(catalog, source, 0)
    }

    fn resolve_at<C>(
        &self,
        catalog: &C,
        source: &LicenseDefinitionSource,
        depth: u32,
    ) -> Resolution<LicenseDefinitionNode>
    where
        C: CatalogFetch + ?Sized,
    {
        if depth >= self.max_depth {
            warn!(depth, max_depth = self.max_depth, "license definition nested too deeply");
            return Resolution::BoundExhausted;
        }

        let mut children = Vec::with_capacity(source.items.len());
        for item in &source.items {
            match self.resolve_item(catalog, item, depth) {
                Resolution::Resolved(node) => children.push(node),
                other => return other,
            }
        }

        if children.len() <= 1 {
            return children.pop().into();
        }

        let Some(join_type) = source.join_type else {
            debug!(depth, children = children.len(), "license definition without join type");
            return Resolution::Absent;
        };
        match LicenseJoin::new(join_type, children) {
            Ok(join) => Resolution::Resolved(LicenseDefinitionNode::Join(join)),
            Err(e) => {
                debug!(depth, "rejected license join: {e}");
                Resolution::Absent
            }
        }
    }

    fn resolve_item<C>(
        &self,
        catalog: &C,
        item: &LicenseDefinitionItem,
        depth: u32,
    ) -> Resolution<LicenseDefinitionNode>
    where
        C: CatalogFetch + ?Sized,
    {
        match (&item.license, &item.license_definition) {
            (Some(license_id), _) => self.resolve_license(catalog, license_id),
            (None, Some(nested)) => self.resolve_at(catalog, nested, depth + 1),
            (None, None) => {
                debug!(depth, "license definition item references nothing");
                Resolution::Absent
            }
        }
    }

    fn resolve_license<C>(
        &self,
        catalog: &C,
        license_id: &ResourceId,
    ) -> Resolution<LicenseDefinitionNode>
    where
        C: CatalogFetch + ?Sized,
    {
        let result = self.migration.resolve(
            license_id,
            |id: &ResourceId| catalog.fetch_license(id),
            identity,
            ResourceKind::License,
        );
        if let Some(cause) = result.cause() {
            debug!(%license_id, "license unavailable: {cause}");
        }
        match result.into_payload() {
            Some(license) => Resolution::Resolved(LicenseDefinitionNode::License(license)),
            None => {
                debug!(%license_id, "license has no payload");
                Resolution::Absent
            }
        }
    }
}


#[cfg(test)]
mod proptests {
    use kb_core::JoinType;
    use proptest::prelude::*;

    use super::*;
    use crate::stub::{license, StubCatalog, StubResponse};

    proptest! {
        /// Hydrated trees keep every leaf in source order, and joins never
        /// have fewer than two children.
        #[test]
        fn leaves_are_preserved(widths in proptest::collection::vec(1usize..4, 1..4)) {
            let stub = StubCatalog::new();
            let mut ids = Vec::new();
            let items = widths
                .iter()
                .map(|&width| {
                    let leaves: Vec<_> = (0..width)
                        .map(|_| {
                            let id = ResourceId::new();
                            stub.on_license(id, StubResponse::Found(license(id, "MIT")));
                            ids.push(id);
                            LicenseDefinitionItem::license(id)
                        })
                        .collect();
                    LicenseDefinitionItem::nested(LicenseDefinitionSource::new(
                        Some(JoinType::Conjunctive),
                        leaves,
                    ))
                })
                .collect();
            let source = LicenseDefinitionSource::new(Some(JoinType::Disjunctive), items);

            let node = LicenseDefinitionResolver::default().resolve(&stub, &source).into_option();
            prop_assert!(node.is_some());
            let node = node.unwrap();
            prop_assert_eq!(node.leaf_count(), ids.len());
            prop_assert_eq!(stub.total_calls(), ids.len());
        }
    }
}
