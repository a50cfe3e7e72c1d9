//! Provisioning modules: file materialization and data bag resolution

pub mod data_bag;
pub mod error;
pub mod files;

// Re-export commonly used types
pub use data_bag::{ConfigStore, DataBagResolver, DirectoryStore, InMemoryStore};
pub use error::*;
pub use files::{FileChange, FileMaterializer, MaterializeReport};
