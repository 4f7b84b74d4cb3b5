//! Analysis runner
//!
//! Drives one analysis through `Validating → Assembling → Executing` and
//! ends in `Completed` or `Failed`. Validation failures never reach the
//! engine; engine calls are retried only for rate limits.

use fincrew_core::{
    CrewError, CrewHooks, CrewOutput, ExecutionEngine, LogBroadcaster, Result, RetryError,
    RetryPolicy,
};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error, info};

use crate::assembler::CrewAssembler;
use crate::config::CrewConfig;
use crate::inputs::AnalysisInputs;

/// Activity-log label used for coordinator events
pub const MANAGER_LABEL: &str = "Crew Manager";

/// Lifecycle of the most recent run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Idle,
    Validating,
    Assembling,
    Executing,
    Completed,
    Failed,
}

impl RunState {
    /// Whether the run has finished
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Runs financial analyses against an execution engine
pub struct AnalysisRunner {
    engine: Arc<dyn ExecutionEngine>,
    log: Arc<LogBroadcaster>,
    assembler: CrewAssembler,
    retry: RetryPolicy,
    state: Mutex<RunState>,
}

impl AnalysisRunner {
    /// Create a runner reporting to `log`
    pub fn new(
        engine: Arc<dyn ExecutionEngine>,
        log: Arc<LogBroadcaster>,
        config: CrewConfig,
    ) -> Self {
        let assembler =
            CrewAssembler::new(Arc::clone(&log), config.model.clone(), config.temperature);
        Self {
            engine,
            log,
            assembler,
            retry: config.retry_policy(),
            state: Mutex::new(RunState::Idle),
        }
    }

    /// Override the retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// The activity log this runner reports to
    pub fn log(&self) -> &Arc<LogBroadcaster> {
        &self.log
    }

    /// State of the current or most recent run
    pub fn state(&self) -> RunState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run an analysis and return the report text
    pub async fn run(&self, inputs: &AnalysisInputs) -> Result<String> {
        self.run_detailed(inputs).await.map(|output| output.raw)
    }

    /// Run an analysis and return the full crew output
    pub async fn run_detailed(&self, inputs: &AnalysisInputs) -> Result<CrewOutput> {
        self.transition(RunState::Validating);

        let mode = inputs.mode();
        if let Err(err) = inputs.validate() {
            return Err(self.fail(err));
        }
        let params = inputs.to_params();
        debug!(%mode, target = inputs.analysis_target(), "Inputs validated");

        self.log.add_log(
            MANAGER_LABEL,
            format!("Starting financial analysis in {mode} mode"),
            None,
        );

        self.transition(RunState::Assembling);
        let unit = match self.assembler.assemble(mode) {
            Ok(unit) => unit,
            Err(err) => return Err(self.fail(err)),
        };

        let risk = inputs
            .risk_tolerance
            .map(|risk| risk.to_string())
            .unwrap_or_default();
        self.log.add_log(
            MANAGER_LABEL,
            "Analysis parameters",
            Some(format!(
                "Capital: {}, Risk: {}",
                inputs.initial_capital, risk
            )),
        );

        self.transition(RunState::Executing);
        info!(engine = self.engine.name(), %mode, "Starting crew execution");
        let hooks = CrewHooks::new(Arc::clone(&self.log));
        let result = self
            .retry
            .execute("crew kickoff", || {
                self.engine.kickoff(&unit, &params, &hooks)
            })
            .await;

        match result {
            Ok(output) => {
                self.log.add_log(MANAGER_LABEL, "Analysis complete", None);
                self.transition(RunState::Completed);
                Ok(output)
            }
            Err(RetryError::Exhausted { attempts, last }) => {
                Err(self.fail_execution(CrewError::RetryExhausted { attempts, last }))
            }
            Err(RetryError::Failed(err)) => Err(self.fail_execution(CrewError::Execution(err))),
        }
    }

    fn transition(&self, next: RunState) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = *state;
        debug!(from = ?previous, to = ?next, "Run state transition");
        *state = next;
    }

    fn fail(&self, err: CrewError) -> CrewError {
        error!("Analysis failed: {}", err);
        self.transition(RunState::Failed);
        err
    }

    fn fail_execution(&self, err: CrewError) -> CrewError {
        self.log
            .add_log(MANAGER_LABEL, "Analysis failed", Some(err.to_string()));
        self.fail(err)
    }
}

impl fmt::Debug for AnalysisRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisRunner")
            .field("engine", &self.engine.name())
            .field("retry", &self.retry)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
