//! Data bag lookups
//!
//! A data bag is a named collection of JSON items held outside the recipe.
//! The resolver reads exactly one field of one item per run and never
//! writes to the store.

pub mod directory;
pub mod memory;
pub mod resolver;
pub mod store;

pub use directory::{DirectoryStore, DEFAULT_DATA_BAG_PATH};
pub use memory::InMemoryStore;
pub use resolver::DataBagResolver;
pub use store::{extract_field, ConfigStore, DataBagItem};
