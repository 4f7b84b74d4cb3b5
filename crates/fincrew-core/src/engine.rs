//! Execution engine contract
//!
//! The engine is the external collaborator that actually runs a crew. It
//! receives an [`ExecutionUnit`], the interpolation parameters and a set of
//! [`CrewHooks`] for reporting per-agent progress.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::broadcaster::LogBroadcaster;
use crate::error::EngineError;
use crate::role::AgentRole;
use crate::task::TaskParams;
use crate::unit::ExecutionUnit;

/// Characters of task output kept in a "Completed task" log entry
const OUTPUT_PREVIEW_CHARS: usize = 100;

/// Output of a single task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Template identifier of the task
    pub task_id: String,
    /// Role label of the agent that produced it
    pub agent: String,
    /// Raw text output
    pub raw: String,
}

/// Result of a crew run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewOutput {
    /// Final report text
    pub raw: String,
    /// Outputs of every executed task, in order
    pub tasks_output: Vec<TaskOutput>,
}

impl CrewOutput {
    /// Output carrying only a final report
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            tasks_output: Vec::new(),
        }
    }
}

/// Progress hooks handed to the engine for one run
#[derive(Debug, Clone)]
pub struct CrewHooks {
    log: Arc<LogBroadcaster>,
}

impl CrewHooks {
    /// Hooks that report into `log`
    pub fn new(log: Arc<LogBroadcaster>) -> Self {
        Self { log }
    }

    /// An agent picked up its task
    pub fn on_agent_start(&self, agent: &AgentRole) {
        self.log.add_log(agent.role, "Starting task", None);
    }

    /// An agent finished its task with `output`
    pub fn on_agent_end(&self, agent: &AgentRole, output: &str) {
        let preview: String = output.chars().take(OUTPUT_PREVIEW_CHARS).collect();
        self.log
            .add_log(agent.role, "Completed task", Some(format!("{preview}...")));
    }

    /// The broadcaster backing these hooks
    pub fn log(&self) -> &Arc<LogBroadcaster> {
        &self.log
    }
}

/// Engine that runs an execution unit to completion
///
/// A call is a single blocking unit of work from the caller's perspective;
/// how the engine schedules model and tool calls internally is its own
/// concern. Rate-limit failures must carry "rate limit" or "too many
/// requests" in their message to be retried by the caller.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    /// Run every task of `unit` and return the final report
    async fn kickoff(
        &self,
        unit: &ExecutionUnit,
        params: &TaskParams,
        hooks: &CrewHooks,
    ) -> Result<CrewOutput, EngineError>;

    /// Engine name (for logging)
    fn name(&self) -> &str;
}
