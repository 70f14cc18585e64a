use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use url::Url;

use crate::errors::AppError;

/// Application configuration module
/// This module handles loading and validating the configuration settings.
/// Nothing is ever written back: the only file the tool produces is the subtitle.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Subtitle site settings
    #[serde(default)]
    pub site: SiteConfig,

    /// Default subtitle language, as the site spells it ("English")
    #[serde(default = "default_language")]
    pub language: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Subtitle site configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SiteConfig {
    // @field: Base URL, prefixed to every relative link found in the pages
    #[serde(default = "default_base_url")]
    pub base_url: String,

    // @field: User agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    // @field: Request timeout seconds, transport default when absent
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: None,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_base_url() -> String {
    "https://yifysubtitles.org".to_string()
}

fn default_user_agent() -> String {
    concat!("yifysub/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_language() -> String {
    "English".to_string()
}

impl Config {
    /// Load a configuration file, falling back to defaults for missing fields
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| AppError::Usage(format!("Failed to open config file {:?}: {}", path, e)))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        let url = Url::parse(&self.site.base_url)
            .map_err(|e| AppError::Usage(format!("Invalid site base URL '{}': {}", self.site.base_url, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(AppError::Usage(format!(
                "Site base URL must use http or https: {}",
                self.site.base_url
            )));
        }

        if self.site.base_url.ends_with('/') {
            return Err(AppError::Usage(format!(
                "Site base URL must not end with '/': {}",
                self.site.base_url
            )));
        }

        if self.language.trim().is_empty() {
            return Err(AppError::Usage("Language must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            site: SiteConfig::default(),
            language: default_language(),
            log_level: LogLevel::default(),
        }
    }
}
