//! Hive Configuration Module
//!
//! Deployment configuration loaded from TOML files.
//!
//! ## Loading Order
//!
//! 1. `HIVE_CONFIG` environment variable (path to TOML file)
//! 2. `hive_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The loaded config is passed explicitly into the composition root; there is
//! no process-global. Capabilities built from it (sources, advisory backend)
//! are injected into the coordinator so tests can substitute doubles.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HiveConfig {
    pub telemetry: TelemetryConfig,
    pub advisory: AdvisoryConfig,
    pub server: ServerConfig,
}

/// Telemetry acquisition and grouping settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// IANA zone used for calendar-day grouping. Deliberately the observer's
    /// zone, not UTC: daily activity is reported to a human keeper.
    pub timezone: String,
    /// Telemetry HTTP endpoint. Unset means file replay only.
    pub endpoint: Option<String>,
    /// Key of the movement record array in the endpoint payload.
    pub movement_key: String,
    /// Key of the environment record array in the endpoint payload.
    pub environment_key: String,
    /// How many recent environment readings to keep from a fetch (0 = all).
    pub environment_limit: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            timezone: "Asia/Tokyo".to_string(),
            endpoint: None,
            movement_key: "bees_count_data".to_string(),
            environment_key: "temperature_humidity_data".to_string(),
            environment_limit: 24,
        }
    }
}

/// Advisory backend settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    /// Base URL of an OpenAI-compatible inference service.
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key. The key itself
    /// never lives in the config file.
    pub api_key_env: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "HIVE_ADVISORY_API_KEY".to_string(),
            max_tokens: 300,
            temperature: 0.7,
        }
    }
}

/// Snapshot API server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
        }
    }
}

impl HiveConfig {
    /// Load configuration using the documented order.
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var("HIVE_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded hive config from HIVE_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from HIVE_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "HIVE_CONFIG points to non-existent file, falling back");
            }
        }

        // 2. Check ./hive_config.toml
        let local = PathBuf::from("hive_config.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded hive config from ./hive_config.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./hive_config.toml, using defaults");
                }
            }
        }

        // 3. Defaults
        info!("No hive_config.toml found — using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    /// Resolve the configured IANA zone. A bad zone name is a startup error,
    /// not something to paper over with UTC.
    pub fn timezone(&self) -> Result<chrono_tz::Tz> {
        self.telemetry
            .timezone
            .parse::<chrono_tz::Tz>()
            .map_err(|_| anyhow!("unknown time zone `{}`", self.telemetry.timezone))
    }

    /// Advisory API key from the configured environment variable, if set.
    pub fn advisory_api_key(&self) -> Option<String> {
        std::env::var(&self.advisory.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}
