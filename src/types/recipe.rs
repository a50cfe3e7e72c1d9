//! Typed recipe inputs: the file to materialize and where its content comes from

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use super::mode::FileMode;
use crate::modules::error::ResolveError;

pub const DEFAULT_OWNER: &str = "root";
pub const DEFAULT_GROUP: &str = "root";

static DATA_BAG_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("data bag name pattern is valid"));

/// Desired end state of a single regular file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSpec {
    pub path: PathBuf,
    pub owner: String,
    pub group: String,
    pub mode: FileMode,
    #[serde(skip)]
    pub content: Vec<u8>,
}

impl FileSpec {
    /// File owned by root:root with mode 0755.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            owner: DEFAULT_OWNER.to_string(),
            group: DEFAULT_GROUP.to_string(),
            mode: FileMode::DEFAULT,
            content: content.into(),
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_mode(mut self, mode: FileMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Address of a single value inside a data bag: `store/item[field]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ConfigReference {
    store: String,
    item: String,
    field: String,
}

impl ConfigReference {
    pub fn new(
        store: impl Into<String>,
        item: impl Into<String>,
        field: impl Into<String>,
    ) -> Result<Self, ResolveError> {
        let reference = Self {
            store: store.into(),
            item: item.into(),
            field: field.into(),
        };
        reference.validate()?;
        Ok(reference)
    }

    /// Store and item names double as directory and file names, so they
    /// are limited to data bag name characters and may not be `.`/`..`.
    pub fn validate(&self) -> Result<(), ResolveError> {
        validate_name("data bag name", &self.store)?;
        validate_name("data bag item", &self.item)?;
        if self.field.is_empty() {
            return Err(ResolveError::InvalidReference {
                reason: "data bag key must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn store(&self) -> &str {
        &self.store
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

impl fmt::Display for ConfigReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}[{}]", self.store, self.item, self.field)
    }
}

/// Check a data bag or item name; `what` names the part in the error.
pub fn validate_name(what: &str, value: &str) -> Result<(), ResolveError> {
    if value.is_empty() {
        return Err(ResolveError::InvalidReference {
            reason: format!("{what} must not be empty"),
        });
    }
    if value == "." || value == ".." || !DATA_BAG_NAME.is_match(value) {
        return Err(ResolveError::InvalidReference {
            reason: format!("{what} '{value}' contains invalid characters"),
        });
    }
    Ok(())
}

/// Which recipe a run executes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeKind {
    Direct,
    DataBag,
}

impl fmt::Display for RecipeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeKind::Direct => write!(f, "direct"),
            RecipeKind::DataBag => write!(f, "data_bag"),
        }
    }
}

/// A recipe invocation: target path plus the source of its content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeConfig {
    Direct { path: PathBuf, content: String },
    DataBag {
        path: PathBuf,
        reference: ConfigReference,
    },
}

impl RecipeConfig {
    pub fn kind(&self) -> RecipeKind {
        match self {
            RecipeConfig::Direct { .. } => RecipeKind::Direct,
            RecipeConfig::DataBag { .. } => RecipeKind::DataBag,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            RecipeConfig::Direct { path, .. } | RecipeConfig::DataBag { path, .. } => path,
        }
    }
}
