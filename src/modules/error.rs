use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while converging a file to its desired state
#[derive(Error, Debug)]
pub enum FileError {
    #[error("Permission denied: {operation} {path}")]
    PermissionDenied { path: PathBuf, operation: String },

    #[error("Invalid path {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    #[error("Invalid permissions format: {mode}")]
    InvalidMode { mode: String },

    #[error("Unknown user: {name}")]
    UnknownUser { name: String },

    #[error("Unknown group: {name}")]
    UnknownGroup { name: String },

    #[error("I/O error during {operation} on {path}: {source}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    /// Classify an I/O error raised by `operation` on `path`.
    ///
    /// `EACCES`/`EPERM` become [`FileError::PermissionDenied`], everything
    /// else stays an I/O error with the original cause attached.
    pub fn from_io(path: &Path, operation: &str, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => FileError::PermissionDenied {
                path: path.to_path_buf(),
                operation: operation.to_string(),
            },
            _ => FileError::Io {
                path: path.to_path_buf(),
                operation: operation.to_string(),
                source: err,
            },
        }
    }

    pub fn invalid_path(path: &Path, reason: impl Into<String>) -> Self {
        FileError::InvalidPath {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while resolving a data bag reference
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Data bag not found: {store}")]
    StoreNotFound { store: String },

    #[error("Data bag item not found: {store}/{item}")]
    ItemNotFound { store: String, item: String },

    #[error("Field '{field}' not found in data bag item {store}/{item}")]
    FieldNotFound {
        store: String,
        item: String,
        field: String,
    },

    #[error("Data bag store unavailable at {location}: {reason}")]
    StoreUnavailable { location: String, reason: String },

    #[error("Invalid data bag item {store}/{item}: {reason}")]
    InvalidItem {
        store: String,
        item: String,
        reason: String,
    },

    #[error("Invalid data bag reference: {reason}")]
    InvalidReference { reason: String },
}

impl ResolveError {
    /// True for any of the three "absent key" variants.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ResolveError::StoreNotFound { .. }
                | ResolveError::ItemNotFound { .. }
                | ResolveError::FieldNotFound { .. }
        )
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, ResolveError::StoreUnavailable { .. })
    }
}
