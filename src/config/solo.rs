//! Run-level settings, loaded from a YAML (or JSON) solo config

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::format;
use crate::modules::data_bag::DEFAULT_DATA_BAG_PATH;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoloConfig {
    /// Root of the chef-solo data bag directory tree
    pub data_bag_path: PathBuf,
    /// `error`, `warn`, `info`, `debug` or `trace`
    pub log_level: String,
    /// Report pending changes without writing
    pub why_run: bool,
}

impl Default for SoloConfig {
    fn default() -> Self {
        Self {
            data_bag_path: PathBuf::from(DEFAULT_DATA_BAG_PATH),
            log_level: "info".to_string(),
            why_run: false,
        }
    }
}

impl SoloConfig {
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: SoloConfig = format::load_file(path).await?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<tracing::Level, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::InvalidAttribute {
                name: "log_level".to_string(),
                reason: format!("unknown level '{}'", self.log_level),
            })
    }
}
