use serde::de::DeserializeOwned;
use std::path::Path;

use super::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
    Auto,
}

impl ConfigFormat {
    /// `.yml`/`.yaml` are YAML, `.json` is JSON, anything else is sniffed
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yml") | Some("yaml") => ConfigFormat::Yaml,
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Auto,
        }
    }

    fn detect(content: &str) -> Self {
        let trimmed = content.trim_start();
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            ConfigFormat::Json
        } else {
            ConfigFormat::Yaml
        }
    }
}

pub fn parse_str<T: DeserializeOwned>(
    content: &str,
    format: ConfigFormat,
) -> Result<T, ConfigError> {
    let format = match format {
        ConfigFormat::Auto => ConfigFormat::detect(content),
        format => format,
    };

    match format {
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| ConfigError::InvalidJson {
            reason: e.to_string(),
        }),
        ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            reason: e.to_string(),
        }),
        ConfigFormat::Auto => unreachable!("Auto format should be resolved by now"),
    }
}

pub async fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    parse_str(&content, ConfigFormat::from_path(path))
}
