//! # Resource Identity
//!
//! Every addressable catalog entity (component, version, variant, license)
//! is named by an opaque UUID wrapped in [`ResourceId`]. The kind of entity
//! is carried separately by [`ResourceKind`], which also knows the path
//! segment under which the catalog serves it.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Opaque unique identifier of one catalog entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(Uuid);

impl ResourceId {
    /// Generate a new random resource identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a resource identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ResourceId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ValidationError::InvalidResourceId(s.to_string()))
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of catalog entity a [`ResourceId`] names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Component,
    Version,
    Variant,
    License,
}

impl ResourceKind {
    /// Path segment that precedes this kind's id in catalog hrefs.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Component => "components",
            Self::Version => "versions",
            Self::Variant => "variants",
            Self::License => "licenses",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Component => "component",
            Self::Version => "version",
            Self::Variant => "variant",
            Self::License => "license",
        };
        f.write_str(s)
    }
}
