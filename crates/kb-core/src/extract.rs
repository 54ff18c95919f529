//! # Id Extraction
//!
//! Parses a destination [`ResourceId`] out of a link href given the path
//! segment that precedes it, e.g. `versions` in
//! `https://kb.example/api/components/{c}/versions/{v}`.
//!
//! Both absolute and relative hrefs are accepted. Any href that does not
//! contain the segment followed by a well-formed UUID yields `None`; the
//! resolvers treat that exactly like "no migration signal".

use url::Url;

use crate::identity::ResourceId;

/// Base used to give relative hrefs a scheme and host for parsing.
const RELATIVE_BASE: &str = "http://kb.invalid/";

/// Extract the id that follows `path_segment` in `href`.
pub fn extract_id(href: &str, path_segment: &str) -> Option<ResourceId> {
    let url = parse_href(href)?;
    let mut segments = url.path_segments()?;
    segments.find(|s| *s == path_segment)?;
    segments.next()?.parse().ok()
}

fn parse_href(href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    match Url::parse(href) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(RELATIVE_BASE).ok()?.join(href).ok()
        }
        Err(_) => None,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any UUID placed after the segment is recovered exactly.
        #[test]
        fn recovers_any_uuid(bytes in any::<[u8; 16]>(), host in "[a-z]{1,12}") {
            let id = ResourceId::from_uuid(uuid::Uuid::from_bytes(bytes));
            let href = format!("https://{host}.example/api/versions/{id}");
            prop_assert_eq!(extract_id(&href, "versions"), Some(id));
        }

        /// Extraction never panics on arbitrary input.
        #[test]
        fn never_panics(href in ".{0,80}", segment in "[a-z]{0,10}") {
            let _ = extract_id(&href, &segment);
        }
    }
}
