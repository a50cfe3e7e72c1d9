use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading node attributes or the solo config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing node attribute: {name}")]
    MissingAttribute { name: String },

    #[error("Conflicting node attributes: {reason}")]
    ConflictingAttributes { reason: String },

    #[error("Invalid node attribute {name}: {reason}")]
    InvalidAttribute { name: String, reason: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON format: {reason}")]
    InvalidJson { reason: String },

    #[error("Invalid YAML format: {reason}")]
    InvalidYaml { reason: String },
}
