//! Storage configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory of `<table>.json` files loaded into the in-memory store
    pub data_dir: String,
    /// JSON file holding the collection schemas
    pub schema_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: "./data".to_string(), schema_path: "./schema.json".to_string() }
    }
}

impl StorageConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(dir) = env::var("VELLUM_DATA_DIR") {
            self.data_dir = dir;
        }
        if let Ok(path) = env::var("VELLUM_SCHEMA_PATH") {
            self.schema_path = path;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_dir.trim().is_empty() {
            bail!("storage.data_dir must not be empty");
        }
        if self.schema_path.trim().is_empty() {
            bail!("storage.schema_path must not be empty");
        }
        Ok(())
    }
}
