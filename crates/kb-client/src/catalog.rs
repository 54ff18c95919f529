//! # HTTP Catalog
//!
//! [`HttpCatalog`] wraps a `reqwest::Client` with the catalog base URL and
//! bearer authentication, and maps each exchange onto a
//! [`ResultEnvelope`].
//!
//! ## Status Mapping
//!
//! | Status | Envelope |
//! |--------|----------|
//! | `200` | payload decoded from the body |
//! | `300`, `301` | `_meta` decoded from the body as migration metadata |
//! | `403`, `404` | no payload, expected code |
//! | anything else | no payload, unexpected code |
//!
//! Redirects are never followed by the HTTP client: a `301` is a migration
//! signal for the resolvers, not a transport concern.
//!
//! ## Blocking Facade
//!
//! [`CatalogFetch`] is synchronous. Its methods drive the async requests on
//! the Tokio runtime reachable from the calling thread. On a multi-threaded
//! runtime this goes through `block_in_place`, so sync fetches are safe
//! from worker tasks and blocking threads alike. With a current-thread
//! runtime, or no runtime at all, the fetch fails with
//! [`TransportError::Runtime`] instead of blocking. Async callers should
//! prefer the `get_*` methods.

use std::collections::BTreeSet;
use std::time::Duration;

use kb_core::{
    CatalogFetch, Component, ComponentVariant, ComponentVersion, HttpResult, License, Meta,
    Priorities, Request, ResourceId, ResourceKind, ResultEnvelope, TransportError,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::runtime::{Handle, RuntimeFlavor};
use url::Url;

use crate::config::KbClientConfig;
use crate::error::KbClientError;
use crate::retry::send_with_backoff;

/// Codes every catalog fetch declares valid.
pub fn expected_codes() -> BTreeSet<u16> {
    [200, 300, 301, 403, 404].into_iter().collect()
}

/// Body of a `300`/`301` response.
#[derive(Debug, Deserialize)]
struct MovedBody {
    #[serde(rename = "_meta")]
    meta: Meta,
}

/// `CatalogFetch` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpCatalog {
    /// Create a new catalog client from configuration.
    pub fn new(config: KbClientConfig) -> Result<Self, KbClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::AUTHORIZATION,
                    reqwest::header::HeaderValue::from_str(&format!(
                        "Bearer {}",
                        config.api_token.as_str()
                    ))
                    .map_err(|_| KbClientError::InvalidToken)?,
                );
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()
            .map_err(|source| KbClientError::Http { source })?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Create a catalog client from environment configuration.
    pub fn from_env() -> Result<Self, KbClientError> {
        Self::new(KbClientConfig::from_env()?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Calls `GET {base_url}/api/components/{id}`.
    pub async fn get_component(&self, id: &ResourceId) -> HttpResult<Component> {
        self.get(ResourceKind::Component, id, None).await
    }

    /// Calls `GET {base_url}/api/versions/{id}` with vulnerability priorities.
    pub async fn get_component_version(
        &self,
        id: &ResourceId,
        priorities: &Priorities,
    ) -> HttpResult<ComponentVersion> {
        self.get(ResourceKind::Version, id, Some(priorities)).await
    }

    /// Calls `GET {base_url}/api/variants/{id}` with vulnerability priorities.
    pub async fn get_component_variant(
        &self,
        id: &ResourceId,
        priorities: &Priorities,
    ) -> HttpResult<ComponentVariant> {
        self.get(ResourceKind::Variant, id, Some(priorities)).await
    }

    /// Calls `GET {base_url}/api/licenses/{id}`.
    pub async fn get_license(&self, id: &ResourceId) -> HttpResult<License> {
        self.get(ResourceKind::License, id, None).await
    }

    /// Full URL of one resource.
    pub fn resource_url(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
        priorities: Option<&Priorities>,
    ) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        let base_path = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{base_path}/api/{}/{id}", kind.path_segment()));
        if let Some(priorities) = priorities {
            url.query_pairs_mut()
                .append_pair("vulnerabilitySourcePriority", priorities.source.as_str())
                .append_pair("vulnerabilityScorePriority", priorities.score.as_str());
        }
        url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
        priorities: Option<&Priorities>,
    ) -> HttpResult<T> {
        let url = self.resource_url(kind, id, priorities);
        let request = Request::get(url.as_str());
        let endpoint = request.to_string();
        tracing::debug!(%kind, %id, "fetching from KB catalog");

        let outcome = self.exchange(kind, url, &endpoint).await;
        HttpResult::new(request, outcome)
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        kind: ResourceKind,
        url: Url,
        endpoint: &str,
    ) -> Result<ResultEnvelope<T>, TransportError> {
        let resp = send_with_backoff(kind, endpoint, || self.http.get(url.clone()).send())
            .await
            .map_err(|e| transport_error(endpoint, &e))?;

        let code = resp.status().as_u16();
        match code {
            200 => {
                let payload = resp.json::<T>().await.map_err(|e| decode_error(endpoint, &e))?;
                Ok(ResultEnvelope::with_payload(code, expected_codes(), payload))
            }
            300 | 301 => {
                let body = resp
                    .json::<MovedBody>()
                    .await
                    .map_err(|e| decode_error(endpoint, &e))?;
                tracing::debug!(%endpoint, code, "KB catalog reported a migration");
                Ok(ResultEnvelope::migrated(code, expected_codes(), body.meta))
            }
            403 | 404 => Ok(ResultEnvelope::absent(code, expected_codes())),
            _ => {
                tracing::warn!(%endpoint, code, "unexpected status from KB catalog");
                Ok(ResultEnvelope::absent(code, expected_codes()))
            }
        }
    }

    /// Drive one async fetch to completion on the ambient Tokio runtime.
    fn blocking<T, Fut>(&self, request: Request, fut: Fut) -> HttpResult<T>
    where
        Fut: std::future::Future<Output = HttpResult<T>>,
    {
        let Ok(rt) = Handle::try_current() else {
            return runtime_unavailable(request, "no async runtime available for HTTP request");
        };
        match rt.runtime_flavor() {
            RuntimeFlavor::MultiThread => tokio::task::block_in_place(|| rt.block_on(fut)),
            _ => runtime_unavailable(
                request,
                "sync catalog fetch needs a multi-threaded runtime",
            ),
        }
    }
}

impl CatalogFetch for HttpCatalog {
    fn fetch_component(&self, id: &ResourceId) -> HttpResult<Component> {
        let request = Request::get(self.resource_url(ResourceKind::Component, id, None).as_str());
        self.blocking(request, self.get_component(id))
    }

    fn fetch_component_version(
        &self,
        id: &ResourceId,
        priorities: &Priorities,
    ) -> HttpResult<ComponentVersion> {
        let url = self.resource_url(ResourceKind::Version, id, Some(priorities));
        self.blocking(Request::get(url.as_str()), self.get_component_version(id, priorities))
    }

    fn fetch_component_variant(
        &self,
        id: &ResourceId,
        priorities: &Priorities,
    ) -> HttpResult<ComponentVariant> {
        let url = self.resource_url(ResourceKind::Variant, id, Some(priorities));
        self.blocking(Request::get(url.as_str()), self.get_component_variant(id, priorities))
    }

    fn fetch_license(&self, id: &ResourceId) -> HttpResult<License> {
        let request = Request::get(self.resource_url(ResourceKind::License, id, None).as_str());
        self.blocking(request, self.get_license(id))
    }
}

fn runtime_unavailable<T>(request: Request, reason: &str) -> HttpResult<T> {
    tracing::warn!(%request, "{reason}");
    HttpResult::new(
        request,
        Err(TransportError::Runtime {
            reason: reason.to_string(),
        }),
    )
}

fn transport_error(endpoint: &str, e: &reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout {
            endpoint: endpoint.to_string(),
        }
    } else {
        TransportError::Connect {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        }
    }
}

fn decode_error(endpoint: &str, e: &reqwest::Error) -> TransportError {
    TransportError::Decode {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    }
}
