//! # Hydrated License Definitions
//!
//! A [`LicenseDefinitionNode`] is either a single resolved [`License`] or a
//! boolean join over two or more nested nodes:
//!
//! ```text
//! Join(DISJUNCTIVE)
//!  ├── License(MIT)
//!  └── Join(CONJUNCTIVE)
//!       ├── License(Apache-2.0)
//!       └── License(BSD-3-Clause)
//! ```
//!
//! Nodes are built bottom-up and are immutable afterwards. A join of
//! fewer than two children is rejected at construction.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::License;

/// Boolean operator joining the children of a license definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JoinType {
    /// All child licenses apply.
    Conjunctive,
    /// Any one child license may be chosen.
    Disjunctive,
}

impl std::fmt::Display for JoinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conjunctive => f.write_str("CONJUNCTIVE"),
            Self::Disjunctive => f.write_str("DISJUNCTIVE"),
        }
    }
}

/// A fully hydrated license definition tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LicenseDefinitionNode {
    License(License),
    Join(LicenseJoin),
}

impl LicenseDefinitionNode {
    /// Number of license leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::License(_) => 1,
            Self::Join(join) => join.children.iter().map(Self::leaf_count).sum(),
        }
    }

    pub fn as_license(&self) -> Option<&License> {
        match self {
            Self::License(license) => Some(license),
            Self::Join(_) => None,
        }
    }

    pub fn as_join(&self) -> Option<&LicenseJoin> {
        match self {
            Self::License(_) => None,
            Self::Join(join) => Some(join),
        }
    }
}

/// Internal node: a join type over at least two children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LicenseJoin {
    join_type: JoinType,
    children: Vec<LicenseDefinitionNode>,
}

impl LicenseJoin {
    pub fn new(
        join_type: JoinType,
        children: Vec<LicenseDefinitionNode>,
    ) -> Result<Self, ValidationError> {
        if children.len() < 2 {
            return Err(ValidationError::DegenerateJoin {
                children: children.len(),
            });
        }
        Ok(Self {
            join_type,
            children,
        })
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn children(&self) -> &[LicenseDefinitionNode] {
        &self.children
    }
}

/// Routes deserialization through [`LicenseJoin::new`] so degenerate joins
/// are rejected on the way in, not silently accepted.
impl<'de> Deserialize<'de> for LicenseJoin {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawJoin {
            join_type: JoinType,
            children: Vec<LicenseDefinitionNode>,
        }

        let raw = RawJoin::deserialize(deserializer)?;
        Self::new(raw.join_type, raw.children).map_err(serde::de::Error::custom)
    }
}
