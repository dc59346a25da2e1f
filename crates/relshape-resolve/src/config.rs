//! Resolver configuration.

use relshape_core::{ConfigError, Error, Result};
use serde::Deserialize;

/// How to treat more than one junction-edge candidate for the same field.
///
/// A well-formed registry never has more than one. `FirstMatch` keeps the
/// first record in registry order and logs a warning; it is a defensive
/// default, not a guarantee about which record wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    #[default]
    FirstMatch,
    /// Treat the field as not resolvable.
    Reject,
}

/// Resolver settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Maximum number of memoized resolutions. 0 disables memoization.
    pub cache_capacity: usize,
    /// Junction-edge ambiguity handling.
    pub ambiguity: AmbiguityPolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 256,
            ambiguity: AmbiguityPolicy::default(),
        }
    }
}

impl ResolverConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            Error::Config(ConfigError {
                message: format!("invalid resolver config: {e}"),
                source: Some(Box::new(e)),
            })
        })
    }

    /// Set the cache capacity.
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Set the ambiguity policy.
    pub fn ambiguity(mut self, policy: AmbiguityPolicy) -> Self {
        self.ambiguity = policy;
        self
    }
}
