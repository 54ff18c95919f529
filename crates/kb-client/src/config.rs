//! KB catalog client configuration.
//!
//! Override via environment variables or explicit construction for
//! staging/testing.

use url::Url;
use zeroize::Zeroizing;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to the KB catalog.
///
/// Custom `Debug` implementation redacts the `api_token` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct KbClientConfig {
    /// Base URL of the catalog. Resource paths (`/api/components/{id}`, ...)
    /// are appended to it.
    pub base_url: Url,
    /// Bearer token for API authentication. Zeroized on drop.
    pub api_token: Zeroizing<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for KbClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KbClientConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl KbClientConfig {
    pub fn new(base_url: Url, api_token: impl Into<String>) -> Self {
        Self {
            base_url,
            api_token: Zeroizing::new(api_token.into()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `KB_BASE_URL` (required)
    /// - `KB_API_TOKEN` (required)
    /// - `KB_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = std::env::var("KB_BASE_URL").map_err(|_| ConfigError::MissingBaseUrl)?;
        let base_url = parse_url("KB_BASE_URL", &raw_url)?;
        let api_token = std::env::var("KB_API_TOKEN").map_err(|_| ConfigError::MissingToken)?;

        Ok(Self {
            base_url,
            api_token: Zeroizing::new(api_token),
            timeout_secs: std::env::var("KB_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Create a configuration pointing to a local mock server (for testing).
    pub fn local_mock(port: u16, token: &str) -> Result<Self, ConfigError> {
        let base_url = parse_url("localhost", &format!("http://127.0.0.1:{port}"))?;
        Ok(Self {
            base_url,
            api_token: Zeroizing::new(token.to_string()),
            timeout_secs: 5,
        })
    }
}

fn parse_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("KB_BASE_URL environment variable is required")]
    MissingBaseUrl,
    #[error("KB_API_TOKEN environment variable is required")]
    MissingToken,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
