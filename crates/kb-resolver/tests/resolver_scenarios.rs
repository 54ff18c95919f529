//! # End-to-End Resolution Scenarios
//!
//! Drives [`KbResolver`] against the scripted in-memory catalog and checks
//! the catalog-visible behavior: which ids were fetched, in what order,
//! and what answer came back.

use std::sync::Arc;
use std::thread;

use kb_core::{
    JoinType, LicenseDefinitionItem, LicenseDefinitionSource, Priorities, Resolution, ResourceId,
    ResourceKind,
};
use kb_resolver::stub::{component, license, variant, version, StubCatalog, StubResponse};
use kb_resolver::{KbResolver, ResolverConfig};

fn resolver(stub: &Arc<StubCatalog>) -> KbResolver<Arc<StubCatalog>> {
    KbResolver::new(Arc::clone(stub), ResolverConfig::default()).expect("default config is valid")
}

// ── Hierarchy ───────────────────────────────────────────────────────────

#[test]
fn merged_component_is_reached_after_restart() {
    let stub = Arc::new(StubCatalog::new());
    let (v, p1, p2) = (ResourceId::new(), ResourceId::new(), ResourceId::new());
    stub.on_version(v, StubResponse::Found(version(v, p1)))
        .on_version(v, StubResponse::Found(version(v, p2)))
        .on_component(p1, StubResponse::Moved(vec![p2]))
        .on_component(p2, StubResponse::Found(component(p2)));

    let hierarchy = resolver(&stub)
        .resolve_component_hierarchy(&v, &Priorities::default())
        .into_option()
        .expect("consistent on second pass");

    assert_eq!(
        stub.calls(),
        vec![
            (ResourceKind::Version, v),
            (ResourceKind::Component, p1),
            (ResourceKind::Component, p2),
            (ResourceKind::Version, v),
            (ResourceKind::Component, p2),
        ]
    );
    assert_eq!(hierarchy.version().payload().map(|v| v.component_id), Some(p2));
    assert_eq!(hierarchy.component().payload().map(|c| c.id), Some(p2));
}

#[test]
fn hierarchy_never_pairs_version_with_foreign_component() {
    let stub = Arc::new(StubCatalog::new());
    let (v, p1, p2) = (ResourceId::new(), ResourceId::new(), ResourceId::new());
    stub.on_version(v, StubResponse::Found(version(v, p1)))
        .on_component(p1, StubResponse::Moved(vec![p2]))
        .on_component(p2, StubResponse::Found(component(p2)));

    let result = resolver(&stub).resolve_component_hierarchy(&v, &Priorities::default());
    assert!(result.is_bound_exhausted());
    assert_eq!(stub.call_count(ResourceKind::Version, &v), 3);
}

#[test]
fn variant_triple_is_consistent() {
    let stub = Arc::new(StubCatalog::new());
    let (x, v, c) = (ResourceId::new(), ResourceId::new(), ResourceId::new());
    stub.on_variant(x, StubResponse::Found(variant(x, v, c)))
        .on_version(v, StubResponse::Found(version(v, c)))
        .on_component(c, StubResponse::Found(component(c)));

    let triple = resolver(&stub)
        .resolve_variant_hierarchy(&x, &Priorities::default())
        .into_option()
        .expect("resolved");
    assert!(triple.is_complete());
    assert_eq!(triple.variant().payload().map(|x| x.version_id), Some(v));
    assert_eq!(triple.component_hierarchy().version().payload().map(|v| v.id), Some(v));
    assert_eq!(stub.total_calls(), 3);
}

#[test]
fn absent_component_makes_variant_absent() {
    let stub = Arc::new(StubCatalog::new());
    let (x, v, c) = (ResourceId::new(), ResourceId::new(), ResourceId::new());
    stub.on_variant(x, StubResponse::Found(variant(x, v, c)))
        .on_version(v, StubResponse::Found(version(v, c)))
        .on_component(c, StubResponse::Missing(403));

    assert_eq!(
        resolver(&stub).resolve_variant_hierarchy(&x, &Priorities::default()),
        Resolution::Absent
    );
}

// ── License definitions ─────────────────────────────────────────────────

#[test]
fn dual_license_with_migrated_member() {
    let stub = Arc::new(StubCatalog::new());
    let (mit, old_apache, apache) = (ResourceId::new(), ResourceId::new(), ResourceId::new());
    stub.on_license(mit, StubResponse::Found(license(mit, "MIT")))
        .on_license(old_apache, StubResponse::Moved(vec![apache]))
        .on_license(apache, StubResponse::Found(license(apache, "Apache-2.0")));

    let source = LicenseDefinitionSource::new(
        Some(JoinType::Disjunctive),
        vec![
            LicenseDefinitionItem::license(mit),
            LicenseDefinitionItem::license(old_apache),
        ],
    );
    let node = resolver(&stub)
        .resolve_license_definition(&source)
        .into_option()
        .expect("resolved");
    let join = node.as_join().expect("two children form a join");
    let ids: Vec<_> = join
        .children()
        .iter()
        .filter_map(|child| child.as_license().map(|l| l.id))
        .collect();
    assert_eq!(ids, vec![mit, apache]);
}

#[test]
fn relative_moved_href_is_followed() {
    let stub = Arc::new(StubCatalog::new());
    let (old, new) = (ResourceId::new(), ResourceId::new());
    stub.on_license(old, StubResponse::MovedHref(vec![format!("/api/licenses/{new}")]))
        .on_license(new, StubResponse::Found(license(new, "BSD-3-Clause")));

    let source = LicenseDefinitionSource::new(None, vec![LicenseDefinitionItem::license(old)]);
    let node = resolver(&stub)
        .resolve_license_definition(&source)
        .into_option()
        .expect("relative href resolves");

    assert_eq!(node.as_license().map(|l| l.id), Some(new));
    assert_eq!(stub.calls(), vec![(ResourceKind::License, old), (ResourceKind::License, new)]);
}

#[test]
fn unreadable_moved_href_leaves_license_unresolved() {
    let stub = Arc::new(StubCatalog::new());
    let (mit, broken) = (ResourceId::new(), ResourceId::new());
    stub.on_license(mit, StubResponse::Found(license(mit, "MIT")))
        .on_license(
            broken,
            StubResponse::MovedHref(vec!["https://kb.stub/api/licenses/not-an-id".into()]),
        );

    let source = LicenseDefinitionSource::new(
        Some(JoinType::Conjunctive),
        vec![LicenseDefinitionItem::license(mit), LicenseDefinitionItem::license(broken)],
    );
    let result = resolver(&stub).resolve_license_definition(&source);

    assert_eq!(result, Resolution::Absent);
    assert_eq!(stub.call_count(ResourceKind::License, &broken), 1);
    assert_eq!(stub.total_calls(), 2);
}

#[test]
fn license_definition_from_version_payload() {
    let stub = Arc::new(StubCatalog::new());
    let (v, c, l) = (ResourceId::new(), ResourceId::new(), ResourceId::new());
    let mut payload = version(v, c);
    payload.license_definition = Some(LicenseDefinitionSource::new(
        None,
        vec![LicenseDefinitionItem::license(l)],
    ));
    stub.on_version(v, StubResponse::Found(payload))
        .on_component(c, StubResponse::Found(component(c)))
        .on_license(l, StubResponse::Found(license(l, "BSD-2-Clause")));

    let kb = resolver(&stub);
    let hierarchy = kb
        .resolve_component_hierarchy(&v, &Priorities::default())
        .into_option()
        .expect("resolved");
    let definition = hierarchy
        .version()
        .payload()
        .and_then(|v| v.license_definition.clone())
        .expect("version carries a definition");
    let node = kb
        .resolve_license_definition(&definition)
        .into_option()
        .expect("resolved");
    assert_eq!(node.as_license().map(|l| l.id), Some(l));
}

// ── Concurrency ─────────────────────────────────────────────────────────

#[test]
fn one_resolver_serves_many_threads() {
    let stub = Arc::new(StubCatalog::new());
    let pairs: Vec<(ResourceId, ResourceId)> =
        (0..8).map(|_| (ResourceId::new(), ResourceId::new())).collect();
    for (v, c) in &pairs {
        stub.on_version(*v, StubResponse::Found(version(*v, *c)))
            .on_component(*c, StubResponse::Found(component(*c)));
    }

    let kb = Arc::new(resolver(&stub));
    let handles: Vec<_> = pairs
        .iter()
        .map(|&(v, c)| {
            let kb = Arc::clone(&kb);
            thread::spawn(move || {
                let hierarchy = kb
                    .resolve_component_hierarchy(&v, &Priorities::default())
                    .into_option()
                    .expect("resolved");
                assert_eq!(hierarchy.component().payload().map(|p| p.id), Some(c));
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("resolver thread panicked");
    }
    assert_eq!(stub.total_calls(), pairs.len() * 2);
}
