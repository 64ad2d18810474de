//! Population depth configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Depth used when a request does not ask for one
    pub default_depth: u32,
    /// Upper bound applied to every requested depth
    pub max_depth: u32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self { default_depth: 2, max_depth: 10 }
    }
}

impl PopulationConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Some(depth) = env::var("VELLUM_DEFAULT_DEPTH").ok().and_then(|v| v.parse().ok()) {
            self.default_depth = depth;
        }
        if let Some(depth) = env::var("VELLUM_MAX_DEPTH").ok().and_then(|v| v.parse().ok()) {
            self.max_depth = depth;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_depth > self.max_depth {
            bail!(
                "population.default_depth ({}) exceeds population.max_depth ({})",
                self.default_depth,
                self.max_depth
            );
        }
        Ok(())
    }

    /// Depth actually used for a request
    pub fn effective_depth(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.default_depth).min(self.max_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_depth() {
        let config = PopulationConfig::default();
        assert_eq!(config.effective_depth(None), 2);
        assert_eq!(config.effective_depth(Some(0)), 0);
        assert_eq!(config.effective_depth(Some(50)), 10);
    }

    #[test]
    fn test_validation() {
        assert!(PopulationConfig::default().validate().is_ok());
        assert!(PopulationConfig { default_depth: 4, max_depth: 3 }.validate().is_err());
    }
}
