//! Logging configuration

use crate::logging::{LogFormat, LogLevel};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `human`, `json` or `logfmt`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "human".to_string() }
    }
}

impl LoggingConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(level) = env::var("VELLUM_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(format) = env::var("VELLUM_LOG_FORMAT") {
            self.format = format;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.log_level()?;
        self.log_format()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<LogLevel> {
        LogLevel::parse(&self.level).ok_or_else(|| anyhow!("Unknown log level '{}'", self.level))
    }

    pub fn log_format(&self) -> Result<LogFormat> {
        LogFormat::parse(&self.format).ok_or_else(|| anyhow!("Unknown log format '{}'", self.format))
    }
}
