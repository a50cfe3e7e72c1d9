use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::modules::files::MaterializeReport;
use crate::types::RecipeKind;

/// Lifecycle of a single recipe run. Every run is one linear pass:
/// `Pending -> [Resolving] -> Writing -> Done`, or `Failed` from any
/// non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Pending,
    Resolving,
    Writing,
    Done,
    Failed,
}

impl RunState {
    pub fn can_transition_to(self, next: RunState) -> bool {
        matches!(
            (self, next),
            (RunState::Pending, RunState::Resolving)
                | (RunState::Pending, RunState::Writing)
                | (RunState::Resolving, RunState::Writing)
                | (RunState::Writing, RunState::Done)
                | (RunState::Pending, RunState::Failed)
                | (RunState::Resolving, RunState::Failed)
                | (RunState::Writing, RunState::Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Done | RunState::Failed)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Pending => "pending",
            RunState::Resolving => "resolving",
            RunState::Writing => "writing",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    pub state: RunState,
    pub at: DateTime<Utc>,
}

/// Records state transitions of one run
#[derive(Debug, Clone)]
pub struct RunTracker {
    run_id: String,
    history: Vec<StateTransition>,
}

impl RunTracker {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            history: vec![StateTransition {
                state: RunState::Pending,
                at: Utc::now(),
            }],
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn current(&self) -> RunState {
        self.history
            .last()
            .map(|transition| transition.state)
            .unwrap_or(RunState::Pending)
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.history
            .first()
            .map(|transition| transition.at)
            .unwrap_or_else(Utc::now)
    }

    /// Move to `next`. Returns false, leaving the state untouched, if the
    /// transition is not allowed.
    pub fn advance(&mut self, next: RunState) -> bool {
        let current = self.current();
        if !current.can_transition_to(next) {
            tracing::warn!(
                "Run {} ignored invalid transition {} -> {}",
                self.run_id,
                current,
                next
            );
            return false;
        }

        tracing::debug!("Run {}: {} -> {}", self.run_id, current, next);
        self.history.push(StateTransition {
            state: next,
            at: Utc::now(),
        });
        true
    }

    pub fn history(&self) -> &[StateTransition] {
        &self.history
    }

    pub fn states(&self) -> Vec<RunState> {
        self.history.iter().map(|transition| transition.state).collect()
    }
}

/// Result of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub node: String,
    pub recipe: RecipeKind,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration: Duration,
    pub history: Vec<StateTransition>,
    pub file: MaterializeReport,
}

impl RunReport {
    pub fn build(
        tracker: &RunTracker,
        node: String,
        recipe: RecipeKind,
        file: MaterializeReport,
        end_time: DateTime<Utc>,
    ) -> Self {
        let start_time = tracker.started_at();
        let duration = (end_time - start_time)
            .to_std()
            .unwrap_or(Duration::from_secs(0));

        Self {
            run_id: tracker.run_id().to_string(),
            node,
            recipe,
            start_time,
            end_time,
            duration,
            history: tracker.history().to_vec(),
            file,
        }
    }

    pub fn changed(&self) -> bool {
        self.file.changed
    }

    pub fn states(&self) -> Vec<RunState> {
        self.history.iter().map(|transition| transition.state).collect()
    }
}
