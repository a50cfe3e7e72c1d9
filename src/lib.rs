//! Rustle Provision - idempotent single-file provisioning
//!
//! This crate converges one file on the local node to an exact content, mode
//! and ownership. Content comes either inline from node attributes or from a
//! data bag, an external keyed configuration store.

pub mod cli;
pub mod config;
pub mod modules;
pub mod runtime;
pub mod types;

pub use config::{NodeAttributes, SoloConfig};
pub use modules::data_bag::{ConfigStore, DataBagResolver, DirectoryStore, InMemoryStore};
pub use modules::files::{FileMaterializer, MaterializeReport};
pub use runtime::{RecipeRunner, RunError, RunReport, RunState, RunnerOptions};
pub use types::*;
