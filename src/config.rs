//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.sentiline.toml` files.

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".sentiline.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Analysis service settings.
    #[serde(default)]
    pub service: ServiceConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Report output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Trigger a save after every successful one-shot analysis.
    #[serde(default)]
    pub save_after_analyze: bool,
}

/// Analysis service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the analysis service.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the per-line classification endpoint.
    #[serde(default = "default_analyze_path")]
    pub analyze_path: String,

    /// Path of the save endpoint.
    #[serde(default = "default_save_path")]
    pub save_path: String,

    /// Path of the history endpoint.
    #[serde(default = "default_history_path")]
    pub history_path: String,

    /// Request timeout in seconds, applied to every call.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            analyze_path: default_analyze_path(),
            save_path: default_save_path(),
            history_path: default_history_path(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_analyze_path() -> String {
    "/api/analyze".to_string()
}

fn default_save_path() -> String {
    "/api/save".to_string()
}

fn default_history_path() -> String {
    "/api/history".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Resolve the configuration for a run.
    ///
    /// An explicit path must load. A `.sentiline.toml` found in `dir` is
    /// optional: if it can't be read or parsed, defaults are used with a warning.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(config_path) = explicit {
            info!("Loading config from: {}", config_path.display());
            return Self::load(config_path);
        }

        match Self::load_from_dir(dir) {
            Ok(Some(config)) => {
                info!("Loaded default config from {}", CONFIG_FILE_NAME);
                Ok(config)
            }
            Ok(None) => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
            Err(e) => {
                warn!("Failed to load config: {:#}", e);
                Ok(Self::default())
            }
        }
    }

    /// Try to load `.sentiline.toml` from a directory.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings; optional
    /// flags only override when given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.url {
            self.service.base_url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.service.timeout_seconds = timeout;
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }

        // Flags always override
        if args.save {
            self.general.save_after_analyze = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
