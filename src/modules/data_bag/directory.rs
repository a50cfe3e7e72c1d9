//! chef-solo style data bags on the local filesystem
//!
//! Layout: `<root>/<data bag>/<item>.json`, each item a JSON object.

use async_trait::async_trait;
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::store::{ConfigStore, DataBagItem};
use crate::modules::error::ResolveError;
use crate::types::recipe::validate_name;

pub const DEFAULT_DATA_BAG_PATH: &str = "/var/chef/data_bags";

#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn unavailable(&self, reason: impl Into<String>) -> ResolveError {
        ResolveError::StoreUnavailable {
            location: self.root.display().to_string(),
            reason: reason.into(),
        }
    }

    async fn ensure_root(&self) -> Result<(), ResolveError> {
        match tokio::fs::metadata(&self.root).await {
            Ok(metadata) if metadata.is_dir() => Ok(()),
            Ok(_) => Err(self.unavailable("data bag path is not a directory")),
            Err(e) => Err(self.unavailable(e.to_string())),
        }
    }
}

impl Default for DirectoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_BAG_PATH)
    }
}

#[async_trait]
impl ConfigStore for DirectoryStore {
    fn name(&self) -> &'static str {
        "directory"
    }

    async fn fetch_item(&self, store: &str, item: &str) -> Result<DataBagItem, ResolveError> {
        validate_name("data bag name", store)?;
        validate_name("data bag item", item)?;
        self.ensure_root().await?;

        let bag_dir = self.root.join(store);
        match tokio::fs::metadata(&bag_dir).await {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => {
                return Err(ResolveError::StoreNotFound {
                    store: store.to_string(),
                })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ResolveError::StoreNotFound {
                    store: store.to_string(),
                })
            }
            Err(e) => return Err(self.unavailable(format!("{}: {e}", bag_dir.display()))),
        }

        let item_path = bag_dir.join(format!("{item}.json"));
        if tokio::fs::metadata(&item_path)
            .await
            .is_ok_and(|metadata| !metadata.is_file())
        {
            return Err(ResolveError::InvalidItem {
                store: store.to_string(),
                item: item.to_string(),
                reason: format!("{} is not a regular file", item_path.display()),
            });
        }

        debug!("Reading data bag item {}", item_path.display());
        let raw = match tokio::fs::read_to_string(&item_path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ResolveError::ItemNotFound {
                    store: store.to_string(),
                    item: item.to_string(),
                })
            }
            Err(e) => return Err(self.unavailable(format!("{}: {e}", item_path.display()))),
        };

        let invalid = |reason: String| ResolveError::InvalidItem {
            store: store.to_string(),
            item: item.to_string(),
            reason,
        };
        let value: Value = serde_json::from_str(&raw).map_err(|e| invalid(e.to_string()))?;
        let Value::Object(fields) = value else {
            return Err(invalid("item is not a JSON object".to_string()));
        };

        if let Some(id) = fields.get("id").and_then(Value::as_str) {
            if id != item {
                warn!("Data bag item {store}/{item} declares mismatched id '{id}'");
            }
        }

        Ok(fields)
    }
}
