//! Map-backed data bags for tests and embedding

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use super::store::{ConfigStore, DataBagItem};
use crate::modules::error::ResolveError;

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    bags: HashMap<String, HashMap<String, DataBagItem>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) an item. Non-object values are stored as an empty item.
    pub fn with_item(mut self, store: &str, item: &str, fields: Value) -> Self {
        self.insert_item(store, item, fields);
        self
    }

    pub fn insert_item(&mut self, store: &str, item: &str, fields: Value) {
        let fields = match fields {
            Value::Object(map) => map,
            _ => DataBagItem::new(),
        };
        self.bags
            .entry(store.to_string())
            .or_default()
            .insert(item.to_string(), fields);
    }

    /// Create an empty data bag
    pub fn with_bag(mut self, store: &str) -> Self {
        self.bags.entry(store.to_string()).or_default();
        self
    }
}

#[async_trait]
impl ConfigStore for InMemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn fetch_item(&self, store: &str, item: &str) -> Result<DataBagItem, ResolveError> {
        let bag = self
            .bags
            .get(store)
            .ok_or_else(|| ResolveError::StoreNotFound {
                store: store.to_string(),
            })?;
        bag.get(item)
            .cloned()
            .ok_or_else(|| ResolveError::ItemNotFound {
                store: store.to_string(),
                item: item.to_string(),
            })
    }
}
