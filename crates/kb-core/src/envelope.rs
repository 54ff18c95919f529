//! # Result Envelopes
//!
//! Value types describing the outcome of exchanges with the catalog.
//!
//! - [`ResultEnvelope`]: one HTTP exchange. Status code, the codes the
//!   caller considers valid, and *either* a payload *or* migration
//!   metadata (never both).
//! - [`HttpResult`]: what a single fetch returns. The request issued plus
//!   an envelope or a [`TransportError`].
//! - [`MigratableResultEnvelope`]: the terminal envelope of a migration
//!   chain plus the ordered history of every migration snapshot traversed.
//! - [`MigratableResult`]: the top-level value of one single-entity
//!   resolution.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::link::Meta;

/// HTTP method of a catalog request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    Get,
}

impl std::fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
        }
    }
}

/// The request side of one exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub method: RequestMethod,
    pub href: String,
}

impl Request {
    pub fn get(href: impl Into<String>) -> Self {
        Self {
            method: RequestMethod::Get,
            href: href.into(),
        }
    }
}

impl std::fmt::Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.href)
    }
}

/// Outcome of one HTTP exchange.
///
/// Fields are private so the payload/migration exclusivity holds by
/// construction: use [`with_payload`](Self::with_payload),
/// [`migrated`](Self::migrated) or [`absent`](Self::absent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultEnvelope<T> {
    code: u16,
    expected_codes: BTreeSet<u16>,
    payload: Option<T>,
    migrated_meta: Option<Meta>,
}

impl<T> ResultEnvelope<T> {
    /// A resolved response carrying a payload.
    pub fn with_payload(code: u16, expected_codes: BTreeSet<u16>, payload: T) -> Self {
        Self {
            code,
            expected_codes,
            payload: Some(payload),
            migrated_meta: None,
        }
    }

    /// A migration signal. Carries no payload.
    pub fn migrated(code: u16, expected_codes: BTreeSet<u16>, meta: Meta) -> Self {
        Self {
            code,
            expected_codes,
            payload: None,
            migrated_meta: Some(meta),
        }
    }

    /// A response with neither payload nor migration signal
    /// (not found, access denied, unexpected status).
    pub fn absent(code: u16, expected_codes: BTreeSet<u16>) -> Self {
        Self {
            code,
            expected_codes,
            payload: None,
            migrated_meta: None,
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn expected_codes(&self) -> &BTreeSet<u16> {
        &self.expected_codes
    }

    /// Whether the actual code is one the caller declared valid.
    /// Distinguishes legitimate absence from an error status.
    pub fn is_expected(&self) -> bool {
        self.expected_codes.contains(&self.code)
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    pub fn into_payload(self) -> Option<T> {
        self.payload
    }

    pub fn migrated_meta(&self) -> Option<&Meta> {
        self.migrated_meta.as_ref()
    }

    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// Convert the payload, keeping code, expected codes and meta.
    pub fn map<U, F>(self, f: F) -> ResultEnvelope<U>
    where
        F: FnOnce(T) -> U,
    {
        ResultEnvelope {
            code: self.code,
            expected_codes: self.expected_codes,
            payload: self.payload.map(f),
            migrated_meta: self.migrated_meta,
        }
    }
}

/// Routes deserialization through the constructors so a payload and a
/// migration signal are never accepted together.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for ResultEnvelope<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawEnvelope<T> {
            code: u16,
            expected_codes: BTreeSet<u16>,
            payload: Option<T>,
            migrated_meta: Option<Meta>,
        }

        let raw = RawEnvelope::<T>::deserialize(deserializer)?;
        match (raw.payload, raw.migrated_meta) {
            (Some(_), Some(_)) => Err(serde::de::Error::custom(
                "envelope carries both a payload and migration metadata",
            )),
            (Some(payload), None) => Ok(Self::with_payload(raw.code, raw.expected_codes, payload)),
            (None, Some(meta)) => Ok(Self::migrated(raw.code, raw.expected_codes, meta)),
            (None, None) => Ok(Self::absent(raw.code, raw.expected_codes)),
        }
    }
}

/// What a single fetch returns: the request issued and its outcome.
#[derive(Debug, Clone)]
pub struct HttpResult<T> {
    pub request: Request,
    pub outcome: Result<ResultEnvelope<T>, TransportError>,
}

impl<T> HttpResult<T> {
    pub fn new(request: Request, outcome: Result<ResultEnvelope<T>, TransportError>) -> Self {
        Self { request, outcome }
    }
}

/// Terminal envelope of a migration chain plus its history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigratableResultEnvelope<T> {
    envelope: ResultEnvelope<T>,
    migrated_meta_history: Vec<Meta>,
}

impl<T> MigratableResultEnvelope<T> {
    pub fn new(envelope: ResultEnvelope<T>, migrated_meta_history: Vec<Meta>) -> Self {
        Self {
            envelope,
            migrated_meta_history,
        }
    }

    pub fn envelope(&self) -> &ResultEnvelope<T> {
        &self.envelope
    }

    pub fn into_envelope(self) -> ResultEnvelope<T> {
        self.envelope
    }

    pub fn payload(&self) -> Option<&T> {
        self.envelope.payload()
    }

    /// Every migration snapshot traversed, oldest first.
    pub fn migrated_meta_history(&self) -> &[Meta] {
        &self.migrated_meta_history
    }

    /// Number of migration hops followed.
    pub fn hop_count(&self) -> usize {
        self.migrated_meta_history.len()
    }
}

/// How a single-entity resolution terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome<T> {
    /// A response was obtained (with or without payload).
    Envelope(MigratableResultEnvelope<T>),
    /// The fetch could not complete its exchange.
    TransportFailure(TransportError),
    /// The attempt budget ran out before any response was obtained.
    BoundExhausted,
}

/// Top-level value of one single-entity resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratableResult<T> {
    request: Option<Request>,
    outcome: MigrationOutcome<T>,
}

impl<T> MigratableResult<T> {
    pub fn resolved(request: Request, envelope: MigratableResultEnvelope<T>) -> Self {
        Self {
            request: Some(request),
            outcome: MigrationOutcome::Envelope(envelope),
        }
    }

    pub fn transport_failure(request: Request, cause: TransportError) -> Self {
        Self {
            request: Some(request),
            outcome: MigrationOutcome::TransportFailure(cause),
        }
    }

    pub fn bound_exhausted() -> Self {
        Self {
            request: None,
            outcome: MigrationOutcome::BoundExhausted,
        }
    }

    /// The request that produced the terminal outcome, if any was issued.
    pub fn request(&self) -> Option<&Request> {
        self.request.as_ref()
    }

    pub fn outcome(&self) -> &MigrationOutcome<T> {
        &self.outcome
    }

    pub fn envelope(&self) -> Option<&MigratableResultEnvelope<T>> {
        match &self.outcome {
            MigrationOutcome::Envelope(envelope) => Some(envelope),
            _ => None,
        }
    }

    pub fn into_envelope(self) -> Option<MigratableResultEnvelope<T>> {
        match self.outcome {
            MigrationOutcome::Envelope(envelope) => Some(envelope),
            _ => None,
        }
    }

    pub fn cause(&self) -> Option<&TransportError> {
        match &self.outcome {
            MigrationOutcome::TransportFailure(cause) => Some(cause),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&T> {
        self.envelope().and_then(MigratableResultEnvelope::payload)
    }

    pub fn into_payload(self) -> Option<T> {
        self.into_envelope()
            .and_then(|envelope| envelope.into_envelope().into_payload())
    }

    pub fn has_payload(&self) -> bool {
        self.payload().is_some()
    }

    /// Migration history of the terminal envelope; empty when no envelope.
    pub fn history(&self) -> &[Meta] {
        self.envelope()
            .map(MigratableResultEnvelope::migrated_meta_history)
            .unwrap_or(&[])
    }

    pub fn is_bound_exhausted(&self) -> bool {
        matches!(self.outcome, MigrationOutcome::BoundExhausted)
    }
}
