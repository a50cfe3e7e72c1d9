//! Node attributes and their conversion into a typed [`RecipeConfig`]

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::format;
use crate::types::{ConfigReference, RecipeConfig};

/// Attributes a node supplies to the file recipes. Keys not listed here
/// (`run_list`, unrelated cookbook attributes) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAttributes {
    pub file_name: Option<String>,
    pub file_contents: Option<String>,
    pub data_bag_name: Option<String>,
    pub data_bag_item: Option<String>,
    pub data_bag_key: Option<String>,
}

impl NodeAttributes {
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        format::load_file(path).await
    }

    pub fn into_recipe(self) -> Result<RecipeConfig, ConfigError> {
        RecipeConfig::try_from(self)
    }

    fn has_data_bag_keys(&self) -> bool {
        self.data_bag_name.is_some() || self.data_bag_item.is_some() || self.data_bag_key.is_some()
    }
}

fn required(value: Option<String>, name: &str) -> Result<String, ConfigError> {
    value.ok_or_else(|| ConfigError::MissingAttribute {
        name: name.to_string(),
    })
}

impl TryFrom<NodeAttributes> for RecipeConfig {
    type Error = ConfigError;

    fn try_from(attributes: NodeAttributes) -> Result<Self, Self::Error> {
        let uses_data_bag = attributes.has_data_bag_keys();
        if uses_data_bag && attributes.file_contents.is_some() {
            return Err(ConfigError::ConflictingAttributes {
                reason: "file_contents cannot be combined with data_bag_* attributes".to_string(),
            });
        }

        let file_name = required(attributes.file_name, "file_name")?;
        if file_name.is_empty() {
            return Err(ConfigError::InvalidAttribute {
                name: "file_name".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        let path = PathBuf::from(file_name);

        if !uses_data_bag {
            let content = required(attributes.file_contents, "file_contents")?;
            return Ok(RecipeConfig::Direct { path, content });
        }

        let store = required(attributes.data_bag_name, "data_bag_name")?;
        let item = required(attributes.data_bag_item, "data_bag_item")?;
        let field = required(attributes.data_bag_key, "data_bag_key")?;
        let reference =
            ConfigReference::new(store, item, field).map_err(|e| ConfigError::InvalidAttribute {
                name: "data_bag_*".to_string(),
                reason: e.to_string(),
            })?;

        Ok(RecipeConfig::DataBag { path, reference })
    }
}
