//! Localization configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizationConfig {
    /// Locale used when a request names none (localized fields untouched when unset)
    pub default_locale: Option<String>,
    /// Known locales; empty means any
    pub locales: Vec<String>,
}

impl LocalizationConfig {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(locale) = env::var("VELLUM_DEFAULT_LOCALE") {
            self.default_locale = Some(locale).filter(|l| !l.is_empty());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(locale) = &self.default_locale {
            if !self.locales.is_empty() && !self.locales.contains(locale) {
                bail!("localization.default_locale '{}' is not listed in localization.locales", locale);
            }
        }
        Ok(())
    }
}
