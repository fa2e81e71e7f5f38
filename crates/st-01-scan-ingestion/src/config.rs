//! Ingestion engine configuration.
//!
//! Loaded from an optional TOML file, then overridden from the environment.
//!
//! ```toml
//! ordering_policy = "sequential"
//! scan_base_url = "https://track.example.com"
//! event_channel_capacity = 1000
//!
//! [location]
//! fallback_enabled = true
//! acquisition_timeout_ms = 5000
//!
//! [location.fallback]
//! lat = 28.6139
//! lng = 77.2090
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::OrderingPolicy;
use shared_types::Coordinate;

/// Environment variable overriding `ordering_policy`.
pub const ENV_ORDERING_POLICY: &str = "ST_ORDERING_POLICY";
/// Environment variable overriding `location.acquisition_timeout_ms`.
pub const ENV_LOCATION_TIMEOUT_MS: &str = "ST_LOCATION_TIMEOUT_MS";
/// Environment variable overriding `scan_base_url`.
pub const ENV_SCAN_BASE_URL: &str = "ST_SCAN_BASE_URL";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Location resolution settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// When false, degraded scans carry no coordinate.
    pub fallback_enabled: bool,
    pub fallback: Coordinate,
    /// Upper bound on one acquisition attempt.
    pub acquisition_timeout_ms: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            fallback_enabled: true,
            // New Delhi
            fallback: Coordinate::new(28.6139, 77.2090),
            acquisition_timeout_ms: 5_000,
        }
    }
}

impl LocationConfig {
    /// Fallback coordinate, if enabled.
    #[must_use]
    pub fn fallback_coordinate(&self) -> Option<Coordinate> {
        self.fallback_enabled.then_some(self.fallback)
    }

    #[must_use]
    pub fn acquisition_timeout(&self) -> Duration {
        Duration::from_millis(self.acquisition_timeout_ms)
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    pub ordering_policy: OrderingPolicy,
    pub location: LocationConfig,
    /// Prefix of rendered checkpoint scan codes.
    pub scan_base_url: String,
    /// Capacity of the dashboard broadcast channel.
    pub event_channel_capacity: usize,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            ordering_policy: OrderingPolicy::default(),
            location: LocationConfig::default(),
            scan_base_url: "http://localhost:8080".to_string(),
            event_channel_capacity: shared_bus::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl IngestionConfig {
    /// Parse from a TOML string. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply `ST_*` environment overrides.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(policy) = lookup(ENV_ORDERING_POLICY) {
            self.ordering_policy = policy.parse().map_err(ConfigError::Invalid)?;
        }
        if let Some(ms) = lookup(ENV_LOCATION_TIMEOUT_MS) {
            self.location.acquisition_timeout_ms = ms.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{} must be an integer: {:?}", ENV_LOCATION_TIMEOUT_MS, ms))
            })?;
        }
        if let Some(url) = lookup(ENV_SCAN_BASE_URL) {
            self.scan_base_url = url.trim().to_string();
        }
        Ok(())
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.location.acquisition_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "location.acquisition_timeout_ms cannot be 0".into(),
            ));
        }

        if self.location.fallback_enabled && !self.location.fallback.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "location.fallback is out of range: {}",
                self.location.fallback
            )));
        }

        if !(self.scan_base_url.starts_with("http://") || self.scan_base_url.starts_with("https://"))
        {
            return Err(ConfigError::Invalid(format!(
                "scan_base_url must be an http(s) URL: {:?}",
                self.scan_base_url
            )));
        }

        if self.event_channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "event_channel_capacity cannot be 0".into(),
            ));
        }

        Ok(())
    }
}
