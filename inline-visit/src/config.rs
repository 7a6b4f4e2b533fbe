//! Composition configuration
//!
//! Options for the runtime-checked composer in [`table`](crate::table).
//! The static composer has no options: everything it checks is checked by
//! the type system.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for composing a dispatch table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    /// What to do with a handler whose domain is not an alternative of the
    /// target variant.
    pub unknown_domains: DomainPolicy,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            unknown_domains: DomainPolicy::Reject,
        }
    }
}

impl ComposeConfig {
    /// Parse a configuration from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Render the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }
}

/// Handling of handlers whose domain is not an alternative.
///
/// Composition is strict by default. `Ignore` relaxes it for handler sets
/// shared between several variants, at the cost of no longer reporting a
/// misplaced handler as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainPolicy {
    /// Fail composition with `ArityMismatch`. The default.
    Reject,
    /// Opt out of the `ArityMismatch` check: drop the handler and log a
    /// warning instead. Missing and ambiguous coverage are still errors.
    Ignore,
}

/// Errors from loading or saving a [`ComposeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid compose config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize compose config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
