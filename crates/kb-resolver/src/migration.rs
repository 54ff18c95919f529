//! # Migration Resolver
//!
//! Chases `moved` links from a requested id to a stable (non-migrating)
//! response, recording every migration snapshot on the way.
//!
//! ## Algorithm
//!
//! Recursive, with an explicit attempt counter starting at 1:
//!
//! 1. `attempt > max_attempts` → bound exhausted.
//! 2. Fetch the current id. A transport failure is returned as-is; retrying
//!    transient failures belongs to the transport layer.
//! 3. No migration meta → convert the payload (if any), attach history, done.
//! 4. Otherwise take the destination from the **first** `moved` link, append
//!    the current meta to the history and recurse with `attempt + 1`.
//! 5. If the deeper call exhausted the bound, settle on the current envelope
//!    with the history accumulated so far.
//!
//! ## Split migrations
//!
//! When a response carries two or more `moved` links only the first is
//! followed; the other candidates are never fetched. This is lossy: callers
//! needing every split destination must read them from the returned
//! history's [`Meta`] snapshots.
//!
//! ## Malformed links
//!
//! A `moved` link whose href does not yield an id for the expected path
//! segment is treated as no migration signal: the current envelope is
//! terminal.

use kb_core::{
    extract_id, HttpResult, Meta, MigratableResult, MigratableResultEnvelope, MigrationKind,
    ResourceId, ResourceKind, ResultEnvelope,
};
use tracing::{debug, warn};

use crate::config::DEFAULT_MIGRATION_MAX_ATTEMPTS;

/// Follows migration chains up to a fixed number of fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationResolver {
    max_attempts: u32,
}

impl Default for MigrationResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MIGRATION_MAX_ATTEMPTS)
    }
}

impl MigrationResolver {
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Resolve `id` to its stable destination.
    ///
    /// `fetch` issues one request per call. `convert` maps the fetched
    /// payload into the caller's type. `kind` selects the path segment used
    /// to read destination ids out of `moved` links.
    pub fn resolve<S, T, F, C>(
        &self,
        id: &ResourceId,
        fetch: F,
        convert: C,
        kind: ResourceKind,
    ) -> MigratableResult<T>
    where
        F: Fn(&ResourceId) -> HttpResult<S>,
        C: Fn(S) -> T,
    {
        self.resolve_at(id, &fetch, &convert, kind, 1, Vec::new())
            .unwrap_or_else(|_| MigratableResult::bound_exhausted())
    }

    /// One step of the chase. `Err` hands the unused history back to the
    /// caller when the attempt bound is hit before fetching.

    fn resolve_at<S, T, F, C>(
        &self,
        id: &ResourceId,
        fetch: &F,
        convert: &C,
        kind: ResourceKind,
        attempt: u32,
        history: Vec<Meta>,
    ) -> Result<MigratableResult<T>, Vec<Meta>>
    where
        F: Fn(&ResourceId) -> HttpResult<S>,
        C: Fn(S) -> T,
    {
        if attempt > self.max_attempts {
            warn!(
                %id,
                %kind,
                max_attempts = self.max_attempts,
                "migration chain exceeded attempt bound"
            );
            return Err(history);
        }

        let HttpResult { request, outcome } = fetch(id);
        let envelope = match outcome {
            Ok(envelope) => envelope,
            Err(cause) => {
                warn!(%id, %kind, %request, "catalog fetch failed: {cause}");
                return Ok(MigratableResult::transport_failure(request, cause));
            }
        };

        let Some(meta) = envelope.migrated_meta() else {
            return Ok(settle(request, envelope, convert, history));
        };
        let Some(destination) = moved_destination(meta, kind) else {
            debug!(
                %id,
                %kind,
                href = %meta.href,
                "unfollowable moved link, settling on current response"
            );
            return Ok(settle(request, envelope, convert, history));
        };

        debug!(from = %id, to = %destination, %kind, attempt, "following migration");
        let mut history = history;
        history.push(meta.clone());

        self.resolve_at(&destination, fetch, convert, kind, attempt + 1, history)
            .or_else(|history| Ok(settle(request, envelope, convert, history)))
    }
}

/// Resolve with the default attempt bound.
pub fn resolve_migratable<S, T, F, C>(
    id: &ResourceId,
    fetch: F,
    convert: C,
    kind: ResourceKind,
) -> MigratableResult<T>
where
    F: Fn(&ResourceId) -> HttpResult<S>,
    C: Fn(S) -> T,
{
    MigrationResolver::default().resolve(id, fetch, convert, kind)
}

fn moved_destination(meta: &Meta, kind: ResourceKind) -> Option<ResourceId> {
    let link = meta.first_moved_link()?;
    if meta.migration_kind() == Some(MigrationKind::Split) {
        debug!(
            href = %meta.href,
            candidates = meta.moved_links().count(),
            "split migration, following first candidate only"
        );
    }
    extract_id(&link.href, kind.path_segment())
}

fn settle<S, T, C>(
    request: kb_core::Request,
    envelope: ResultEnvelope<S>,
    convert: &C,
    history: Vec<Meta>,
) -> MigratableResult<T>
where
    C: Fn(S) -> T,
{
    MigratableResult::resolved(
        request,
        MigratableResultEnvelope::new(envelope.map(convert), history),
    )
}
