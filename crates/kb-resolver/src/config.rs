//! Resolver bounds.
//!
//! Every recursive resolution carries an explicit attempt or depth bound.
//! Defaults match the catalog's documented limits. Override via environment
//! variables or explicit construction.

use serde::Deserialize;

/// Default migration hops followed before giving up.
pub const DEFAULT_MIGRATION_MAX_ATTEMPTS: u32 = 5;

/// Default full-chain restarts for hierarchy consistency.
pub const DEFAULT_HIERARCHY_MAX_ATTEMPTS: u32 = 3;

/// Default license definition nesting (the catalog's documented maximum).
pub const DEFAULT_LICENSE_MAX_DEPTH: u32 = 10;

/// Bounds for the three resolvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Fetches the migration resolver issues per entity.
    pub migration_max_attempts: u32,
    /// Whole-chain attempts the hierarchy resolver makes.
    pub hierarchy_max_attempts: u32,
    /// Deepest license definition nesting that is hydrated.
    pub license_max_depth: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            migration_max_attempts: DEFAULT_MIGRATION_MAX_ATTEMPTS,
            hierarchy_max_attempts: DEFAULT_HIERARCHY_MAX_ATTEMPTS,
            license_max_depth: DEFAULT_LICENSE_MAX_DEPTH,
        }
    }
}

impl ResolverConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `KB_MIGRATION_MAX_ATTEMPTS` (default: 5)
    /// - `KB_HIERARCHY_MAX_ATTEMPTS` (default: 3)
    /// - `KB_LICENSE_MAX_DEPTH` (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            migration_max_attempts: env_u32(
                "KB_MIGRATION_MAX_ATTEMPTS",
                DEFAULT_MIGRATION_MAX_ATTEMPTS,
            )?,
            hierarchy_max_attempts: env_u32(
                "KB_HIERARCHY_MAX_ATTEMPTS",
                DEFAULT_HIERARCHY_MAX_ATTEMPTS,
            )?,
            license_max_depth: env_u32("KB_LICENSE_MAX_DEPTH", DEFAULT_LICENSE_MAX_DEPTH)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject bounds that would make every resolution fail before its
    /// first fetch.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bounds = [
            ("migration_max_attempts", self.migration_max_attempts),
            ("hierarchy_max_attempts", self.hierarchy_max_attempts),
            ("license_max_depth", self.license_max_depth),
        ];
        match bounds.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(ConfigError::ZeroBound(*name)),
            None => Ok(()),
        }
    }
}

fn env_u32(var: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(var.to_string(), raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be at least 1")]
    ZeroBound(&'static str),
    #[error("invalid number for {0}: {1:?}")]
    InvalidNumber(String, String),
}
