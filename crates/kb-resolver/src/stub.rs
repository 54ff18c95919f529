//! # In-Memory Stub Catalog
//!
//! A scripted [`CatalogFetch`] for tests and local experiments. Each id
//! gets a queue of responses: every fetch consumes the front of the queue
//! until one response is left, which then repeats forever. Unscripted ids
//! answer `404`.
//!
//! Every fetch is recorded, so tests can assert which ids were (and were
//! not) requested and in what order.

use std::collections::{BTreeSet, HashMap, VecDeque};

use kb_core::{
    CatalogFetch, Component, ComponentVariant, ComponentVersion, HttpResult, License, Link, Meta,
    Priorities, Request, ResourceId, ResourceKind, ResultEnvelope, TransportError,
};
use parking_lot::Mutex;

/// Base href for stub responses.
const STUB_BASE: &str = "https://kb.stub/api";

/// Status codes every stub fetch declares valid.
pub fn stub_expected_codes() -> BTreeSet<u16> {
    [200, 300, 301, 403, 404].into_iter().collect()
}

/// Href of a resource in the stub catalog.
pub fn stub_href(kind: ResourceKind, id: &ResourceId) -> String {
    format!("{STUB_BASE}/{}/{id}", kind.path_segment())
}

/// One scripted answer.
#[derive(Debug, Clone)]
pub enum StubResponse<T> {
    /// `200` with a payload.
    Found(T),
    /// `301` (one target) or `300` (several) with `moved` links to ids of
    /// the same kind.
    Moved(Vec<ResourceId>),
    /// Like `Moved`, with verbatim hrefs.
    MovedHref(Vec<String>),
    /// A status with neither payload nor migration signal.
    Missing(u16),
    /// The exchange could not complete.
    Fail,
}

type Scripts<T> = Mutex<HashMap<ResourceId, VecDeque<StubResponse<T>>>>;

/// Scripted in-memory catalog.
#[derive(Debug, Default)]
pub struct StubCatalog {
    components: Scripts<Component>,
    versions: Scripts<ComponentVersion>,
    variants: Scripts<ComponentVariant>,
    licenses: Scripts<License>,
    calls: Mutex<Vec<(ResourceKind, ResourceId)>>,
}

impl StubCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for a component id.
    pub fn on_component(&self, id: ResourceId, response: StubResponse<Component>) -> &Self {
        self.components.lock().entry(id).or_default().push_back(response);
        self
    }

    /// Queue a response for a version id.
    pub fn on_version(&self, id: ResourceId, response: StubResponse<ComponentVersion>) -> &Self {
        self.versions.lock().entry(id).or_default().push_back(response);
        self
    }

    /// Queue a response for a variant id.
    pub fn on_variant(&self, id: ResourceId, response: StubResponse<ComponentVariant>) -> &Self {
        self.variants.lock().entry(id).or_default().push_back(response);
        self
    }

    /// Queue a response for a license id.
    pub fn on_license(&self, id: ResourceId, response: StubResponse<License>) -> &Self {
        self.licenses.lock().entry(id).or_default().push_back(response);
        self
    }

    /// Every fetch issued so far, in order.
    pub fn calls(&self) -> Vec<(ResourceKind, ResourceId)> {
        self.calls.lock().clone()
    }

    /// How many times `id` of `kind` was fetched.
    pub fn call_count(&self, kind: ResourceKind, id: &ResourceId) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|(k, i)| *k == kind && i == id)
            .count()
    }

    /// Total number of fetches.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().len()
    }

    fn answer<T: Clone>(
        &self,
        scripts: &Scripts<T>,
        kind: ResourceKind,
        id: &ResourceId,
    ) -> HttpResult<T> {
        self.calls.lock().push((kind, *id));

        let response = {
            let mut scripts = scripts.lock();
            match scripts.get_mut(id) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        let href = stub_href(kind, id);
        let request = Request::get(href.clone());
        let outcome = match response.unwrap_or(StubResponse::Missing(404)) {
            StubResponse::Found(payload) => {
                Ok(ResultEnvelope::with_payload(200, stub_expected_codes(), payload))
            }
            StubResponse::Moved(targets) => {
                let hrefs = targets.iter().map(|t| stub_href(kind, t)).collect();
                Ok(moved_envelope(href, hrefs))
            }
            StubResponse::MovedHref(hrefs) => Ok(moved_envelope(href, hrefs)),
            StubResponse::Missing(code) => Ok(ResultEnvelope::absent(code, stub_expected_codes())),
            StubResponse::Fail => Err(TransportError::Connect {
                endpoint: request.to_string(),
                reason: "stub transport failure".into(),
            }),
        };
        HttpResult::new(request, outcome)
    }
}

fn moved_envelope<T>(href: String, targets: Vec<String>) -> ResultEnvelope<T> {
    let code = if targets.len() > 1 { 300 } else { 301 };
    let links = targets.into_iter().map(Link::moved).collect();
    ResultEnvelope::migrated(code, stub_expected_codes(), Meta::new(href, links))
}

impl CatalogFetch for StubCatalog {
    fn fetch_component(&self, id: &ResourceId) -> HttpResult<Component> {
        self.answer(&self.components, ResourceKind::Component, id)
    }

    fn fetch_component_version(
        &self,
        id: &ResourceId,
        _priorities: &Priorities,
    ) -> HttpResult<ComponentVersion> {
        self.answer(&self.versions, ResourceKind::Version, id)
    }

    fn fetch_component_variant(
        &self,
        id: &ResourceId,
        _priorities: &Priorities,
    ) -> HttpResult<ComponentVariant> {
        self.answer(&self.variants, ResourceKind::Variant, id)
    }

    fn fetch_license(&self, id: &ResourceId) -> HttpResult<License> {
        self.answer(&self.licenses, ResourceKind::License, id)
    }
}

// ─── Fixtures ───────────────────────────────────────────────────────

/// A component payload whose own id is `id`.
pub fn component(id: ResourceId) -> Component {
    Component {
        id,
        name: format!("component-{id}"),
        description: None,
        homepage: None,
        meta: Meta::new(stub_href(ResourceKind::Component, &id), Vec::new()),
    }
}

/// A version payload referencing `component_id` as its parent.
pub fn version(id: ResourceId, component_id: ResourceId) -> ComponentVersion {
    ComponentVersion {
        id,
        component_id,
        version: Some("1.0.0".into()),
        released_on: None,
        license_definition: None,
        meta: Meta::new(stub_href(ResourceKind::Version, &id), Vec::new()),
    }
}

/// A variant payload referencing `version_id` and `component_id`.
pub fn variant(
    id: ResourceId,
    version_id: ResourceId,
    component_id: ResourceId,
) -> ComponentVariant {
    ComponentVariant {
        id,
        version_id,
        component_id,
        external_namespace: Some("maven".into()),
        external_id: Some(format!("org.example:artifact:{id}")),
        meta: Meta::new(stub_href(ResourceKind::Variant, &id), Vec::new()),
    }
}

/// A license payload.
pub fn license(id: ResourceId, spdx_id: &str) -> License {
    License {
        id,
        name: spdx_id.to_string(),
        spdx_id: Some(spdx_id.to_string()),
        ownership: Some("OPEN_SOURCE".into()),
        meta: Meta::new(stub_href(ResourceKind::License, &id), Vec::new()),
    }
}
