//! # Catalog DTOs
//!
//! Entities as served by the KB. Only the fields the resolvers read are
//! required (`id`, the parent reference, `_meta`); descriptive fields are
//! optional and default when missing.
//!
//! Fields use `#[serde(default)]` for resilience against schema evolution.
//! Unknown fields are ignored, `deny_unknown_fields` is intentionally not
//! used.

use serde::{Deserialize, Serialize};

use crate::identity::ResourceId;
use crate::license::JoinType;
use crate::link::Meta;

/// A component (project) in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(rename = "_meta", default)]
    pub meta: Meta,
}

/// One release of a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentVersion {
    pub id: ResourceId,
    /// Parent component this version belongs to.
    pub component_id: ResourceId,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub released_on: Option<String>,
    #[serde(default)]
    pub license_definition: Option<LicenseDefinitionSource>,
    #[serde(rename = "_meta", default)]
    pub meta: Meta,
}

/// A packaging of a component version in some external namespace
/// (e.g. a Maven coordinate or an npm package).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentVariant {
    pub id: ResourceId,
    /// Parent version this variant belongs to.
    pub version_id: ResourceId,
    pub component_id: ResourceId,
    #[serde(default)]
    pub external_namespace: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(rename = "_meta", default)]
    pub meta: Meta,
}

/// A single license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub spdx_id: Option<String>,
    #[serde(default)]
    pub ownership: Option<String>,
    #[serde(rename = "_meta", default)]
    pub meta: Meta,
}

/// Unresolved license definition as the catalog returns it: a join type
/// over items that are license references or nested definitions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseDefinitionSource {
    #[serde(rename = "type", default)]
    pub join_type: Option<JoinType>,
    #[serde(default)]
    pub items: Vec<LicenseDefinitionItem>,
}

impl LicenseDefinitionSource {
    pub fn new(join_type: Option<JoinType>, items: Vec<LicenseDefinitionItem>) -> Self {
        Self { join_type, items }
    }
}

/// One entry of a [`LicenseDefinitionSource`]. Well-formed items carry
/// exactly one of `license` or `license_definition`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseDefinitionItem {
    #[serde(default)]
    pub license: Option<ResourceId>,
    #[serde(default)]
    pub license_definition: Option<LicenseDefinitionSource>,
}

impl LicenseDefinitionItem {
    /// A direct license reference.
    pub fn license(id: ResourceId) -> Self {
        Self {
            license: Some(id),
            license_definition: None,
        }
    }

    /// A nested sub-definition.
    pub fn nested(definition: LicenseDefinitionSource) -> Self {
        Self {
            license: None,
            license_definition: Some(definition),
        }
    }
}

/// Which vulnerability source the KB prefers when summarizing a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VulnerabilitySourcePriority {
    #[default]
    Bdsa,
    Nvd,
}

impl VulnerabilitySourcePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bdsa => "BDSA",
            Self::Nvd => "NVD",
        }
    }
}

/// Which CVSS generation the KB prefers when scoring vulnerabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VulnerabilityScorePriority {
    #[default]
    Cvss3,
    Cvss2,
}

impl VulnerabilityScorePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cvss3 => "CVSS3",
            Self::Cvss2 => "CVSS2",
        }
    }
}

/// Source/score filters forwarded to version and variant fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Priorities {
    pub source: VulnerabilitySourcePriority,
    pub score: VulnerabilityScorePriority,
}

impl Priorities {
    pub fn new(source: VulnerabilitySourcePriority, score: VulnerabilityScorePriority) -> Self {
        Self { source, score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_decodes_from_camel_case_wire() {
        let json = serde_json::json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "componentId": "11111111-1111-1111-1111-111111111111",
            "version": "2.4.1",
            "licenseDefinition": {
                "type": "DISJUNCTIVE",
                "items": [
                    {"license": "22222222-2222-2222-2222-222222222222"},
                    {"licenseDefinition": {"items": [
                        {"license": "33333333-3333-3333-3333-333333333333"}
                    ]}}
                ]
            },
            "_meta": {"href": "/api/versions/550e8400-e29b-41d4-a716-446655440000"},
            "unmodeledField": true
        });
        let version: ComponentVersion = serde_json::from_value(json).unwrap();
        assert_eq!(
            version.component_id.to_string(),
            "11111111-1111-1111-1111-111111111111"
        );
        let def = version.license_definition.unwrap();
        assert_eq!(def.join_type, Some(JoinType::Disjunctive));
        assert_eq!(def.items.len(), 2);
        assert!(def.items[0].license.is_some());
        assert!(def.items[1].license_definition.is_some());
    }

    #[test]
    fn component_meta_defaults_when_missing() {
        let json = serde_json::json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "name": "openssl"
        });
        let component: Component = serde_json::from_value(json).unwrap();
        assert!(component.meta.links.is_empty());
        assert!(component.description.is_none());
    }

    #[test]
    fn default_priorities() {
        let p = Priorities::default();
        assert_eq!(p.source.as_str(), "BDSA");
        assert_eq!(p.score.as_str(), "CVSS3");
    }
}
