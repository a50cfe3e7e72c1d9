use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use uuid::Uuid;

use crate::config::NodeAttributes;
use crate::modules::data_bag::{ConfigStore, DataBagResolver};
use crate::modules::files::{FileMaterializer, MaterializeReport};
use crate::runtime::{
    error::RunError,
    state::{RunReport, RunState, RunTracker},
};
use crate::types::{FileSpec, RecipeConfig};

/// Runner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunnerOptions {
    /// Report pending changes without touching the filesystem
    pub check_mode: bool,
    /// Node name for reports; the hostname when unset
    pub node_name: Option<String>,
}

/// Runs one file recipe against the local node
pub struct RecipeRunner<S> {
    resolver: DataBagResolver<S>,
    materializer: FileMaterializer,
    options: RunnerOptions,
    node_name: String,
}

impl<S: ConfigStore> RecipeRunner<S> {
    pub fn new(store: S) -> Self {
        Self::with_options(store, RunnerOptions::default())
    }

    pub fn with_options(store: S, options: RunnerOptions) -> Self {
        let node_name = options.node_name.clone().unwrap_or_else(detect_node_name);
        Self {
            resolver: DataBagResolver::new(store),
            materializer: FileMaterializer::new(),
            options,
            node_name,
        }
    }

    pub fn options(&self) -> &RunnerOptions {
        &self.options
    }

    pub fn store(&self) -> &S {
        self.resolver.store()
    }

    /// Validate raw node attributes, then run the recipe they select
    pub async fn run_attributes(&self, attributes: NodeAttributes) -> Result<RunReport, RunError> {
        let recipe = attributes.into_recipe().map_err(|e| {
            tracing::error!("Invalid node attributes: {}", e);
            RunError::from(e)
        })?;
        self.run(&recipe).await
    }

    /// Execute a recipe: resolve content if needed, then converge the file.
    /// The first failure aborts the run and is returned to the caller.
    pub async fn run(&self, recipe: &RecipeConfig) -> Result<RunReport, RunError> {
        let start_time = Instant::now();
        let mut tracker = RunTracker::new(Uuid::new_v4().to_string());

        tracing::info!(
            "Starting run {} of recipe[{}] on {}",
            tracker.run_id(),
            recipe.kind(),
            self.node_name
        );

        match self.execute(recipe, &mut tracker).await {
            Ok(file) => {
                tracker.advance(RunState::Done);
                let report = RunReport::build(
                    &tracker,
                    self.node_name.clone(),
                    recipe.kind(),
                    file,
                    Utc::now(),
                );
                tracing::info!(
                    "Run {} completed in {:?}: {} ({} change(s))",
                    report.run_id,
                    start_time.elapsed(),
                    if report.changed() { "updated" } else { "up to date" },
                    report.file.changes.len()
                );
                Ok(report)
            }
            Err(e) => {
                tracker.advance(RunState::Failed);
                tracing::error!(
                    "Run {} failed while {}: {}",
                    tracker.run_id(),
                    e.failed_in(),
                    e
                );
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        recipe: &RecipeConfig,
        tracker: &mut RunTracker,
    ) -> Result<MaterializeReport, RunError> {
        let content = match recipe {
            RecipeConfig::Direct { content, .. } => content.clone(),
            RecipeConfig::DataBag { reference, .. } => {
                tracker.advance(RunState::Resolving);
                self.resolver.resolve(reference).await?
            }
        };

        let spec = FileSpec::new(recipe.path(), content);
        tracker.advance(RunState::Writing);

        let report = if self.options.check_mode {
            self.materializer.check(&spec).await?
        } else {
            self.materializer.converge(&spec).await?
        };
        Ok(report)
    }
}

fn detect_node_name() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}
