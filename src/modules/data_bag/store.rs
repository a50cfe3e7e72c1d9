//! The keyed configuration store seam

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::modules::error::ResolveError;
use crate::types::ConfigReference;

/// A single data bag item: field name to JSON value
pub type DataBagItem = serde_json::Map<String, Value>;

/// Read-only access to data bags
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Store backend name, used in log lines
    fn name(&self) -> &'static str;

    /// Fetch a whole item from a data bag
    async fn fetch_item(&self, store: &str, item: &str) -> Result<DataBagItem, ResolveError>;

    /// Fetch the single value addressed by `reference`
    async fn get(&self, reference: &ConfigReference) -> Result<String, ResolveError> {
        let item = self
            .fetch_item(reference.store(), reference.item())
            .await?;
        extract_field(reference, &item)
    }
}

#[async_trait]
impl<T: ConfigStore + ?Sized> ConfigStore for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn fetch_item(&self, store: &str, item: &str) -> Result<DataBagItem, ResolveError> {
        (**self).fetch_item(store, item).await
    }

    async fn get(&self, reference: &ConfigReference) -> Result<String, ResolveError> {
        (**self).get(reference).await
    }
}

#[async_trait]
impl<T: ConfigStore + ?Sized> ConfigStore for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn fetch_item(&self, store: &str, item: &str) -> Result<DataBagItem, ResolveError> {
        (**self).fetch_item(store, item).await
    }

    async fn get(&self, reference: &ConfigReference) -> Result<String, ResolveError> {
        (**self).get(reference).await
    }
}

/// Pull `reference.field()` out of `item` as a string.
///
/// Strings come back verbatim, numbers and booleans as their JSON text.
pub fn extract_field(
    reference: &ConfigReference,
    item: &DataBagItem,
) -> Result<String, ResolveError> {
    let value = item
        .get(reference.field())
        .ok_or_else(|| ResolveError::FieldNotFound {
            store: reference.store().to_string(),
            item: reference.item().to_string(),
            field: reference.field().to_string(),
        })?;

    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(ResolveError::InvalidItem {
            store: reference.store().to_string(),
            item: reference.item().to_string(),
            reason: format!("field '{}' is not a scalar value", reference.field()),
        }),
    }
}
