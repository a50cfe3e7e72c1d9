//! Resolves a [`ConfigReference`] to the content string it names

use tracing::{debug, warn};

use super::store::ConfigStore;
use crate::modules::error::ResolveError;
use crate::types::ConfigReference;

/// Read-only resolver over an injected [`ConfigStore`]
pub struct DataBagResolver<S> {
    store: S,
}

impl<S: ConfigStore> DataBagResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Look up the value once. No caching, no retry.
    pub async fn resolve(&self, reference: &ConfigReference) -> Result<String, ResolveError> {
        reference.validate()?;
        debug!(
            "Resolving data bag value {} from {} store",
            reference,
            self.store.name()
        );

        match self.store.get(reference).await {
            Ok(value) => {
                // the value itself is never logged
                debug!("Resolved {} ({} bytes)", reference, value.len());
                Ok(value)
            }
            Err(e) => {
                warn!("Failed to resolve {}: {}", reference, e);
                Err(e)
            }
        }
    }
}
