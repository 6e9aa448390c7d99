//! Repository configuration

use serde::{Deserialize, Serialize};

use crate::errors::{Result, WeftError};

/// Default number of snapshots retained per repository key
pub const DEFAULT_MAX_SNAPSHOTS_PER_KEY: usize = 500;

/// Tunables of a [`SnapshotRepository`](crate::repository::SnapshotRepository)
///
/// Deserializable from TOML, e.g.:
///
/// ```toml
/// max_snapshots_per_key = 50
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Snapshots kept per key; beyond this the least recently used one is
    /// evicted (the latest snapshot of a key is always kept)
    pub max_snapshots_per_key: usize,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            max_snapshots_per_key: DEFAULT_MAX_SNAPSHOTS_PER_KEY,
        }
    }
}

impl RepositoryConfig {
    pub fn with_max_snapshots_per_key(mut self, max: usize) -> Self {
        self.max_snapshots_per_key = max;
        self
    }

    /// Check invariants
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `max_snapshots_per_key` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_snapshots_per_key < 1 {
            return Err(WeftError::InvalidConfig {
                reason: format!(
                    "max_snapshots_per_key must be larger than 0: {}",
                    self.max_snapshots_per_key
                ),
            });
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the document does not parse or fails validation.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: RepositoryConfig =
            toml::from_str(s).map_err(|e| WeftError::InvalidConfig {
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }
}
