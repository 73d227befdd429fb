//! Configuration management for the UniSender client

use serde::{Deserialize, Serialize};
use crate::error::{UnisenderError, Result};
use std::path::Path;

/// Languages the API can answer in
const SUPPORTED_LANGS: &[&str] = &["en", "ru", "it"];

/// Client configuration. Built once and shared read-only by every component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnisenderConfig {
    #[serde(alias = "key")]  // Accept both 'api_key' and 'key'
    pub api_key: String,

    /// Tracking marker sent with every request
    pub platform: String,

    #[serde(alias = "url", default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_lang")]
    pub lang: String,

    /// Response format requested from the API
    #[serde(default = "default_format")]
    pub format: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Default functions
fn default_base_url() -> String {
    "https://api.unisender.com".to_string()
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_format() -> String {
    "json".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl UnisenderConfig {
    /// Configuration with default endpoint, language and format
    pub fn new(api_key: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            platform: platform.into(),
            base_url: default_base_url(),
            lang: default_lang(),
            format: default_format(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| UnisenderError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_json_str(&content)
    }

    /// Load configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| UnisenderError::Config(format!("Failed to parse config: {}", e)))?;

        let base_url = config.base_url.clone();
        let config = config.with_base_url(base_url);
        config.validate()?;
        Ok(config)
    }

    /// Endpoint root; trailing slashes are dropped
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(UnisenderError::Config("UniSender API key is required".to_string()));
        }

        if self.platform.is_empty() {
            return Err(UnisenderError::Config("Platform marker is required".to_string()));
        }

        if self.base_url.is_empty() {
            return Err(UnisenderError::Config("Base URL is required".to_string()));
        }

        if !SUPPORTED_LANGS.contains(&self.lang.as_str()) {
            return Err(UnisenderError::Config(format!(
                "Unsupported language '{}', expected one of: {}",
                self.lang,
                SUPPORTED_LANGS.join(", ")
            )));
        }

        Ok(())
    }
}
