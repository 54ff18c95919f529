//! # Links and Migration Metadata
//!
//! Every catalog response carries a [`Meta`]: its own canonical href plus
//! an ordered list of typed [`Link`]s. The only relation the resolvers
//! inspect is [`LinkRelation::Moved`]:
//!
//! | `moved` links | Meaning |
//! |---------------|---------|
//! | 0 | not a migration signal |
//! | 1 | merge: the id permanently resolves to one new id |
//! | ≥2 | split: content was partitioned across several new ids |
//!
//! Link order is preserved from the wire. For splits only the first
//! `moved` link is ever followed.

use serde::{Deserialize, Serialize};

/// Relation tag on a link. Unknown relations pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LinkRelation {
    /// The resource has migrated to the link target.
    Moved,
    /// Any other relation, kept verbatim.
    Other(String),
}

impl LinkRelation {
    const MOVED: &'static str = "moved";

    /// The wire form of this relation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Moved => Self::MOVED,
            Self::Other(rel) => rel,
        }
    }
}

impl From<String> for LinkRelation {
    fn from(rel: String) -> Self {
        if rel.eq_ignore_ascii_case(Self::MOVED) {
            Self::Moved
        } else {
            Self::Other(rel)
        }
    }
}

impl From<LinkRelation> for String {
    fn from(rel: LinkRelation) -> Self {
        match rel {
            LinkRelation::Moved => LinkRelation::MOVED.to_string(),
            LinkRelation::Other(rel) => rel,
        }
    }
}

impl std::fmt::Display for LinkRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed, typed reference to another catalog address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub rel: LinkRelation,
    pub href: String,
}

impl Link {
    pub fn new(rel: LinkRelation, href: impl Into<String>) -> Self {
        Self {
            rel,
            href: href.into(),
        }
    }

    /// Shorthand for a `moved` link.
    pub fn moved(href: impl Into<String>) -> Self {
        Self::new(LinkRelation::Moved, href)
    }

    pub fn is_moved(&self) -> bool {
        self.rel == LinkRelation::Moved
    }
}

/// Shape of a migration, derived from the number of `moved` links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MigrationKind {
    /// Exactly one destination.
    Merge,
    /// Two or more candidate destinations.
    Split,
}

/// Metadata envelope carried by every catalog entity and response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Canonical address of the resource this meta describes.
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Meta {
    pub fn new(href: impl Into<String>, links: Vec<Link>) -> Self {
        Self {
            href: href.into(),
            links,
        }
    }

    /// All `moved` links, in wire order.
    pub fn moved_links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(|l| l.is_moved())
    }

    /// The `moved` link a resolver follows. For splits this is the first
    /// candidate; the rest are never explored.
    pub fn first_moved_link(&self) -> Option<&Link> {
        self.moved_links().next()
    }

    /// Classify this meta as a merge, a split, or no migration at all.
    pub fn migration_kind(&self) -> Option<MigrationKind> {
        match self.moved_links().count() {
            0 => None,
            1 => Some(MigrationKind::Merge),
            _ => Some(MigrationKind::Split),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn other(rel: &str, href: &str) -> Link {
        Link::new(LinkRelation::Other(rel.into()), href)
    }

    #[test]
    fn no_moved_links_is_not_a_migration() {
        let meta = Meta::new("/api/components/a", vec![other("self", "/x")]);
        assert_eq!(meta.migration_kind(), None);
        assert!(meta.first_moved_link().is_none());
    }

    #[test]
    fn one_moved_link_is_a_merge() {
        let meta = Meta::new(
            "/api/components/a",
            vec![other("home", "/h"), Link::moved("/api/components/b")],
        );
        assert_eq!(meta.migration_kind(), Some(MigrationKind::Merge));
        assert_eq!(meta.first_moved_link().unwrap().href, "/api/components/b");
    }

    #[test]
    fn split_keeps_wire_order() {
        let meta = Meta::new(
            "/api/components/a",
            vec![
                Link::moved("/api/components/b"),
                other("self", "/x"),
                Link::moved("/api/components/c"),
            ],
        );
        assert_eq!(meta.migration_kind(), Some(MigrationKind::Split));
        let hrefs: Vec<_> = meta.moved_links().map(|l| l.href.as_str()).collect();
        assert_eq!(hrefs, vec!["/api/components/b", "/api/components/c"]);
        assert_eq!(meta.first_moved_link().unwrap().href, "/api/components/b");
    }

    #[test]
    fn relation_wire_format() {
        let json = serde_json::json!({
            "href": "/api/licenses/a",
            "links": [
                {"rel": "moved", "href": "/api/licenses/b"},
                {"rel": "text", "href": "/api/licenses/a/text"}
            ]
        });
        let meta: Meta = serde_json::from_value(json).unwrap();
        assert_eq!(meta.links[0].rel, LinkRelation::Moved);
        assert_eq!(meta.links[1].rel, LinkRelation::Other("text".into()));

        let back = serde_json::to_value(&meta).unwrap();
        assert_eq!(back["links"][0]["rel"], "moved");
        assert_eq!(back["links"][1]["rel"], "text");
    }

    #[test]
    fn meta_tolerates_missing_fields() {
        let meta: Meta = serde_json::from_str("{}").unwrap();
        assert!(meta.href.is_empty());
        assert!(meta.links.is_empty());
    }
}
