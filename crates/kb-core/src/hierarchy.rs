//! # Hierarchy Results
//!
//! Mutually consistent snapshots of a component → version (→ variant)
//! chain. Values of these types are only built after the hierarchy
//! resolver has established cross-level consistency, so they never
//! represent a version alongside a component that is not its parent.

use crate::envelope::MigratableResult;
use crate::model::{Component, ComponentVariant, ComponentVersion};

/// A consistent component/version pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentHierarchy {
    component: MigratableResult<Component>,
    version: MigratableResult<ComponentVersion>,
}

impl ComponentHierarchy {
    pub fn new(
        component: MigratableResult<Component>,
        version: MigratableResult<ComponentVersion>,
    ) -> Self {
        Self { component, version }
    }

    pub fn component(&self) -> &MigratableResult<Component> {
        &self.component
    }

    pub fn version(&self) -> &MigratableResult<ComponentVersion> {
        &self.version
    }

    /// True iff every level carries a payload. Never fetches.
    pub fn is_complete(&self) -> bool {
        self.component.has_payload() && self.version.has_payload()
    }
}

/// A consistent component/version/variant triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantHierarchy {
    hierarchy: ComponentHierarchy,
    variant: MigratableResult<ComponentVariant>,
}

impl VariantHierarchy {
    pub fn new(hierarchy: ComponentHierarchy, variant: MigratableResult<ComponentVariant>) -> Self {
        Self { hierarchy, variant }
    }

    pub fn component(&self) -> &MigratableResult<Component> {
        self.hierarchy.component()
    }

    pub fn version(&self) -> &MigratableResult<ComponentVersion> {
        self.hierarchy.version()
    }

    pub fn variant(&self) -> &MigratableResult<ComponentVariant> {
        &self.variant
    }

    /// The component/version levels on their own.
    pub fn component_hierarchy(&self) -> &ComponentHierarchy {
        &self.hierarchy
    }

    pub fn is_complete(&self) -> bool {
        self.hierarchy.is_complete() && self.variant.has_payload()
    }
}
