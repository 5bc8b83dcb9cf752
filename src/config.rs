//! Configuration handling for form rendering

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable pointing at an explicit config file
pub const CONFIG_ENV: &str = "WEBFORM_CONFIG";

const DEFAULT_REQUIRED_MARKER: &str = "*";
const DEFAULT_ERROR_CLASS: &str = "validation-failed";
const DEFAULT_ID_PREFIX: &str = "form-element-";

/// Rendering and message settings shared by all forms of an application
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FormConfig {
    /// Marker appended to labels of required fields
    pub required_marker: Option<String>,
    /// CSS class of the inline error list
    pub error_class: Option<String>,
    /// Prefix of generated element ids
    pub element_id_prefix: Option<String>,
    /// Message overrides keyed by rule name
    #[serde(default)]
    pub messages: HashMap<String, String>,
}

impl FormConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("org", "webform", "webform")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the default location, or defaults if absent
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: FormConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        tracing::debug!("Loaded form config from {}", path.display());
        Ok(config)
    }

    pub fn required_marker(&self) -> &str {
        self.required_marker
            .as_deref()
            .unwrap_or(DEFAULT_REQUIRED_MARKER)
    }

    pub fn error_class(&self) -> &str {
        self.error_class.as_deref().unwrap_or(DEFAULT_ERROR_CLASS)
    }

    pub fn element_id_prefix(&self) -> &str {
        self.element_id_prefix
            .as_deref()
            .unwrap_or(DEFAULT_ID_PREFIX)
    }

    /// Message for a failed rule, preferring the configured override
    pub fn message<'a>(&'a self, rule: &str, default: &'a str) -> &'a str {
        self.messages.get(rule).map(String::as_str).unwrap_or(default)
    }
}
