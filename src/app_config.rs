use anyhow::{Context, Result, anyhow};
use log::{LevelFilter, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::database::DatabaseConnection;
use crate::language_utils::validate_locale;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Current locale (e.g. "en", "pt_BR")
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Locale tried when the current one has no line
    #[serde(default = "default_locale")]
    pub fallback_locale: String,

    /// SQLite database file; defaults to the user data directory
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Directory for cached buckets; defaults to the user cache directory
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Language files consulted when the database has no text
    #[serde(default)]
    pub lang_path: Option<PathBuf>,

    /// Namespace to language directory
    #[serde(default)]
    pub namespaces: BTreeMap<String, PathBuf>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching filter for the `log` facade
    pub fn level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Directory name used under the user data and cache directories
const APP_DIRNAME: &str = "dbtrans";

fn default_locale() -> String {
    "en".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        validate_locale(&self.locale).context("Invalid locale")?;
        validate_locale(&self.fallback_locale).context("Invalid fallback locale")?;

        for (namespace, hint) in &self.namespaces {
            if namespace.is_empty() || namespace == "*" {
                return Err(anyhow!("Invalid namespace name: '{}'", namespace));
            }
            if hint.as_os_str().is_empty() {
                return Err(anyhow!("Namespace '{}' has an empty language directory", namespace));
            }
        }

        Ok(())
    }

    /// Load the configuration file, writing a default one if it does not exist
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Load the configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Database file to open
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => DatabaseConnection::default_database_path(),
        }
    }

    /// Directory holding cached buckets
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.clone());
        }
        let base = dirs::cache_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
            .ok_or_else(|| anyhow!("Could not determine cache directory"))?;
        Ok(base.join(APP_DIRNAME).join("locales"))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            locale: default_locale(),
            fallback_locale: default_locale(),
            database_path: None,
            cache_dir: None,
            lang_path: None,
            namespaces: BTreeMap::new(),
            log_level: LogLevel::default(),
        }
    }
}
