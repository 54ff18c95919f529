//! Backoff for catalog GETs that fail before any response arrives.
//!
//! Only transient failures (connect errors and timeouts) are retried. A
//! request that cannot be built, or any HTTP response whatever its status,
//! is handed straight back: status mapping is the catalog's concern.

use std::time::Duration;

use kb_core::ResourceKind;

/// Retries after the first attempt.
pub(crate) const MAX_RETRIES: u32 = 3;

/// First backoff step; each later step doubles it.
const BASE_DELAY: Duration = Duration::from_millis(200);

/// Whether a failed send is worth repeating.
pub(crate) fn is_transient(e: &reqwest::Error) -> bool {
    e.is_connect() || e.is_timeout()
}

fn backoff(retry: u32) -> Duration {
    BASE_DELAY * 2u32.pow(retry)
}

/// Send one catalog GET, repeating it on transient failures.
///
/// `send` is invoked at most `MAX_RETRIES + 1` times.
pub(crate) async fn send_with_backoff<F, Fut>(
    kind: ResourceKind,
    endpoint: &str,
    send: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let mut retry = 0;
    loop {
        match send().await {
            Err(e) if retry < MAX_RETRIES && is_transient(&e) => {
                let delay = backoff(retry);
                retry += 1;
                tracing::warn!(
                    %kind,
                    %endpoint,
                    retry,
                    max_retries = MAX_RETRIES,
                    ?delay,
                    "transient KB catalog failure: {e}"
                );
                tokio::time::sleep(delay).await;
            }
            other => return other,
        }
    }
}
