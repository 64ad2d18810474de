//! Configuration system for Vellum
//!
//! Values are resolved in the following order (highest priority wins):
//!
//! 1. **Environment variables** (`VELLUM_*`)
//! 2. **Config file** (`vellum.toml`)
//! 3. **Defaults**
//!
//! # Example
//!
//! ```no_run
//! use vellum_core::config::VellumConfig;
//!
//! let config = VellumConfig::load()?;
//! config.validate()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod localization;
pub mod logging;
pub mod population;
pub mod storage;

pub use localization::LocalizationConfig;
pub use logging::LoggingConfig;
pub use population::PopulationConfig;
pub use storage::StorageConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name
pub const CONFIG_FILE: &str = "vellum.toml";

/// Complete Vellum configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VellumConfig {
    pub storage: StorageConfig,
    pub population: PopulationConfig,
    pub localization: LocalizationConfig,
    pub logging: LoggingConfig,
}

impl VellumConfig {
    /// Load `vellum.toml` from the working directory, then environment overrides
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load from a specific file (skipped if absent), then environment overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::default();

        if path.exists() {
            let file_config = Self::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.merge(file_config);
        }

        config.apply_env_vars();
        Ok(config)
    }

    /// Parse a TOML file; missing sections and keys take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.as_ref().display()))
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.storage.merge(other.storage);
        self.population.merge(other.population);
        self.localization.merge(other.localization);
        self.logging.merge(other.logging);
    }

    pub fn apply_env_vars(&mut self) {
        self.storage.apply_env_vars();
        self.population.apply_env_vars();
        self.localization.apply_env_vars();
        self.logging.apply_env_vars();
    }

    pub fn validate(&self) -> Result<()> {
        self.storage.validate()?;
        self.population.validate()?;
        self.localization.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = VellumConfig::default();
        assert_eq!(config.population.default_depth, 2);
        assert_eq!(config.population.max_depth, 10);
        assert_eq!(config.storage.data_dir, "./data");
        assert!(config.localization.default_locale.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[population]\ndefault_depth = 1\n\n[localization]\ndefault_locale = \"en\"\nlocales = [\"en\", \"fr\"]"
        )
        .unwrap();

        let config = VellumConfig::from_file(file.path()).unwrap();
        assert_eq!(config.population.default_depth, 1);
        assert_eq!(config.population.max_depth, 10);
        assert_eq!(config.localization.default_locale.as_deref(), Some("en"));
        assert_eq!(config.logging.format, "human");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = VellumConfig::default();
        config.localization.default_locale = Some("de".to_string());
        config.localization.locales = vec!["en".to_string()];
        assert!(config.validate().is_err());

        let mut config = VellumConfig::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = VellumConfig::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.population, PopulationConfig::default());
    }
}
