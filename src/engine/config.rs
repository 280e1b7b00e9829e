//! Engine configuration options.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Reuse aggregates and team records while the snapshot fingerprint is unchanged.
    pub memoize: bool,
    /// Leader list length when the caller does not ask for one.
    pub default_leader_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            memoize: true,
            default_leader_limit: 10,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_leader_limit == 0 {
            return Err(ConfigError::invalid("engine.default_leader_limit", "must be at least 1"));
        }
        Ok(())
    }
}
