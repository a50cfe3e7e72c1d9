use thiserror::Error;

use super::state::RunState;
use crate::config::ConfigError;
use crate::modules::error::{FileError, ResolveError};

/// Why a recipe run failed. The first failure aborts the run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Invalid node configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Data bag resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("File materialization failed: {0}")]
    Materialize(#[from] FileError),
}

impl RunError {
    /// The state the run was in when it failed
    pub fn failed_in(&self) -> RunState {
        match self {
            RunError::Config(_) => RunState::Pending,
            RunError::Resolve(_) => RunState::Resolving,
            RunError::Materialize(_) => RunState::Writing,
        }
    }
}
