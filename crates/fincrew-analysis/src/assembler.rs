//! Mode-specific crew assembly

use fincrew_core::{ExecutionUnit, LogBroadcaster, ManagerRole, Result, TaskTemplate};
use std::sync::Arc;
use tracing::debug;

use crate::inputs::AnalysisMode;
use crate::models::resolve_model;
use crate::roster::{Specialist, TaskKind, roster};

/// Specialists and tasks for `mode`, index-aligned
pub fn lineup(mode: AnalysisMode) -> [(Specialist, TaskKind); 4] {
    match mode {
        AnalysisMode::Portfolio => [
            (Specialist::MarketResearch, TaskKind::MarketResearch),
            (Specialist::StockSelection, TaskKind::StockSelection),
            (Specialist::StrategyDeveloper, TaskKind::StrategyDevelopment),
            (Specialist::RiskAdvisor, TaskKind::RiskAssessment),
        ],
        AnalysisMode::Single => [
            (Specialist::DataAnalyst, TaskKind::DataAnalysis),
            (Specialist::StrategyDeveloper, TaskKind::StrategyDevelopment),
            (Specialist::ExecutionAdvisor, TaskKind::ExecutionPlanning),
            (Specialist::RiskAdvisor, TaskKind::RiskAssessment),
        ],
    }
}

/// Builds a fresh [`ExecutionUnit`] per run
#[derive(Debug, Clone)]
pub struct CrewAssembler {
    log: Arc<LogBroadcaster>,
    model: String,
    temperature: f32,
}

impl CrewAssembler {
    /// Create an assembler reporting to `log`
    ///
    /// `model` is validated against the allow-list on every assembly.
    pub fn new(log: Arc<LogBroadcaster>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            log,
            model: model.into(),
            temperature,
        }
    }

    /// Assemble the crew for `mode`
    ///
    /// Logs "Agent initialized" once per listed role.
    pub fn assemble(&self, mode: AnalysisMode) -> Result<ExecutionUnit> {
        let manager = ManagerRole {
            model: resolve_model(&self.model).to_string(),
            temperature: self.temperature,
        };

        let (roles, tasks): (Vec<_>, Vec<TaskTemplate>) = lineup(mode)
            .into_iter()
            .map(|(specialist, kind)| (roster().role(specialist), kind.template()))
            .unzip();

        let unit = ExecutionUnit::new(mode.to_string(), roles, tasks, manager)?;
        debug!(mode = %mode, model = %unit.manager().model, "Crew assembled");

        for role in unit.roles() {
            self.log.add_log(role.role, "Agent initialized", None);
        }

        Ok(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(model: &str) -> (Arc<LogBroadcaster>, CrewAssembler) {
        let log = Arc::new(LogBroadcaster::new());
        let assembler = CrewAssembler::new(Arc::clone(&log), model, 0.7);
        (log, assembler)
    }

    fn role_ids(unit: &ExecutionUnit) -> Vec<&'static str> {
        unit.roles().iter().map(|r| r.id).collect()
    }

    fn task_ids(unit: &ExecutionUnit) -> Vec<&'static str> {
        unit.tasks().iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_portfolio_lineup() {
        let (_, assembler) = setup("gpt-4o");
        let unit = assembler.assemble(AnalysisMode::Portfolio).unwrap();

        assert_eq!(
            role_ids(&unit),
            [
                "market_research_specialist",
                "stock_selection_specialist",
                "strategy_developer",
                "risk_advisor"
            ]
        );
        assert_eq!(
            task_ids(&unit),
            [
                "market_research",
                "stock_selection",
                "strategy_development",
                "risk_assessment"
            ]
        );
        assert_eq!(unit.name(), "portfolio");
    }

    #[test]
    fn test_single_lineup() {
        let (_, assembler) = setup("gpt-4o");
        let unit = assembler.assemble(AnalysisMode::Single).unwrap();

        assert_eq!(
            role_ids(&unit),
            [
                "data_analyst",
                "strategy_developer",
                "execution_advisor",
                "risk_advisor"
            ]
        );
        assert_eq!(
            task_ids(&unit),
            [
                "data_analysis",
                "strategy_development",
                "execution_planning",
                "risk_assessment"
            ]
        );
    }

    #[test]
    fn test_one_initialized_entry_per_role() {
        for mode in [AnalysisMode::Portfolio, AnalysisMode::Single] {
            let (log, assembler) = setup("gpt-4o");
            let unit = assembler.assemble(mode).unwrap();

            let logs = log.get_logs();
            assert_eq!(logs.len(), 4);
            for (entry, role) in logs.iter().zip(unit.roles()) {
                assert_eq!(entry.agent(), role.role);
                assert_eq!(entry.action(), "Agent initialized");
            }
        }
    }

    #[test]
    fn test_manager_model_fallback() {
        let (_, assembler) = setup("not-a-model");
        let unit = assembler.assemble(AnalysisMode::Single).unwrap();
        assert_eq!(unit.manager().model, "gpt-4o-mini");

        let (_, assembler) = setup("gpt-4-turbo");
        let unit = assembler.assemble(AnalysisMode::Single).unwrap();
        assert_eq!(unit.manager().model, "gpt-4-turbo");
    }

    #[test]
    fn test_manager_not_in_lineup() {
        let (_, assembler) = setup("gpt-4o");
        let unit = assembler.assemble(AnalysisMode::Portfolio).unwrap();
        assert!(unit.roles().iter().all(|r| r.role != "Crew Manager"));
    }
}
