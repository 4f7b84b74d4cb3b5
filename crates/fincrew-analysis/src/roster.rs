//! Static roster of specialist roles and task templates

use fincrew_core::{AgentRole, TaskTemplate};
use serde::Serialize;
use std::sync::{Arc, LazyLock};

use crate::prompts::{persona, task};

/// The six fixed specialist identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialist {
    DataAnalyst,
    StrategyDeveloper,
    ExecutionAdvisor,
    RiskAdvisor,
    StockSelection,
    MarketResearch,
}

impl Specialist {
    /// Every specialist
    pub const ALL: [Specialist; 6] = [
        Specialist::DataAnalyst,
        Specialist::StrategyDeveloper,
        Specialist::ExecutionAdvisor,
        Specialist::RiskAdvisor,
        Specialist::StockSelection,
        Specialist::MarketResearch,
    ];

    /// Stable role identifier
    pub fn id(self) -> &'static str {
        match self {
            Self::DataAnalyst => "data_analyst",
            Self::StrategyDeveloper => "strategy_developer",
            Self::ExecutionAdvisor => "execution_advisor",
            Self::RiskAdvisor => "risk_advisor",
            Self::StockSelection => "stock_selection_specialist",
            Self::MarketResearch => "market_research_specialist",
        }
    }

    fn build(self) -> AgentRole {
        let (label, goal, backstory) = match self {
            Self::DataAnalyst => (
                "Data Analyst",
                persona::DATA_ANALYST_GOAL,
                persona::DATA_ANALYST_BACKSTORY,
            ),
            Self::StrategyDeveloper => (
                "Trading Strategy Developer",
                persona::STRATEGY_DEVELOPER_GOAL,
                persona::STRATEGY_DEVELOPER_BACKSTORY,
            ),
            Self::ExecutionAdvisor => (
                "Trade Advisor",
                persona::EXECUTION_ADVISOR_GOAL,
                persona::EXECUTION_ADVISOR_BACKSTORY,
            ),
            Self::RiskAdvisor => (
                "Risk Advisor",
                persona::RISK_ADVISOR_GOAL,
                persona::RISK_ADVISOR_BACKSTORY,
            ),
            Self::StockSelection => (
                "Investment Portfolio Curator",
                persona::STOCK_SELECTION_GOAL,
                persona::STOCK_SELECTION_BACKSTORY,
            ),
            Self::MarketResearch => (
                "Market Opportunity Scout",
                persona::MARKET_RESEARCH_GOAL,
                persona::MARKET_RESEARCH_BACKSTORY,
            ),
        };
        AgentRole::new(self.id(), label, goal, backstory)
    }
}

/// The six task templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    DataAnalysis,
    StrategyDevelopment,
    ExecutionPlanning,
    RiskAssessment,
    MarketResearch,
    StockSelection,
}

impl TaskKind {
    /// The template, bound to its owning specialist
    pub fn template(self) -> TaskTemplate {
        let (id, owner, description, expected_output) = match self {
            Self::DataAnalysis => (
                "data_analysis",
                Specialist::DataAnalyst,
                task::DATA_ANALYSIS,
                task::DATA_ANALYSIS_OUTPUT,
            ),
            Self::StrategyDevelopment => (
                "strategy_development",
                Specialist::StrategyDeveloper,
                task::STRATEGY_DEVELOPMENT,
                task::STRATEGY_DEVELOPMENT_OUTPUT,
            ),
            Self::ExecutionPlanning => (
                "execution_planning",
                Specialist::ExecutionAdvisor,
                task::EXECUTION_PLANNING,
                task::EXECUTION_PLANNING_OUTPUT,
            ),
            Self::RiskAssessment => (
                "risk_assessment",
                Specialist::RiskAdvisor,
                task::RISK_ASSESSMENT,
                task::RISK_ASSESSMENT_OUTPUT,
            ),
            Self::MarketResearch => (
                "market_research",
                Specialist::MarketResearch,
                task::MARKET_RESEARCH,
                task::MARKET_RESEARCH_OUTPUT,
            ),
            Self::StockSelection => (
                "stock_selection",
                Specialist::StockSelection,
                task::STOCK_SELECTION,
                task::STOCK_SELECTION_OUTPUT,
            ),
        };
        TaskTemplate {
            id,
            owner: owner.id(),
            description,
            expected_output,
        }
    }
}

/// Shared, immutable role instances
pub struct Roster {
    roles: Vec<(Specialist, Arc<AgentRole>)>,
}

impl Roster {
    fn new() -> Self {
        Self {
            roles: Specialist::ALL
                .iter()
                .map(|s| (*s, Arc::new(s.build())))
                .collect(),
        }
    }

    /// The shared role for `specialist`
    pub fn role(&self, specialist: Specialist) -> Arc<AgentRole> {
        self.roles
            .iter()
            .find(|(s, _)| *s == specialist)
            .map(|(_, role)| Arc::clone(role))
            .unwrap_or_else(|| Arc::new(specialist.build()))
    }
}

static ROSTER: LazyLock<Roster> = LazyLock::new(Roster::new);

/// The process-wide roster, built on first use
pub fn roster() -> &'static Roster {
    &ROSTER
}
