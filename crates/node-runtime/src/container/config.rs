//! # Node Configuration
//!
//! Loading order: defaults, then the TOML file named by `ST_CONFIG` (if set),
//! then `ST_*` environment overrides. The result is validated before use.

use std::path::{Path, PathBuf};

use st_01_scan_ingestion::{ConfigError, IngestionConfig};
use tracing::info;

/// Environment variable naming the TOML config file.
pub const ENV_CONFIG_PATH: &str = "ST_CONFIG";

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// Engine configuration.
    pub ingestion: IngestionConfig,
    /// Where the engine configuration was read from, if anywhere.
    pub source: Option<PathBuf>,
}

impl NodeConfig {
    /// Load from the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(ENV_CONFIG_PATH).map(PathBuf::from);
        let mut config = Self::load_from(path.as_deref())?;
        config.ingestion.apply_env_overrides()?;
        config.ingestion.validate()?;
        Ok(config)
    }

    /// Load from an optional file, without environment overrides.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let ingestion = IngestionConfig::load(path)?;
        info!(path = %path.display(), "Loaded configuration file");
        Ok(Self {
            ingestion,
            source: Some(path.to_path_buf()),
        })
    }
}
