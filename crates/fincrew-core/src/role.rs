//! Agent role definitions

use serde::Serialize;

/// Tool capability an agent may use through the execution engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Web search lookup
    Search,
    /// Single-page content scrape
    Scrape,
}

impl Capability {
    /// Every capability, in the order tools are offered to agents
    pub const ALL: [Capability; 2] = [Capability::Scrape, Capability::Search];
}

/// A specialist identity executing one or more tasks
///
/// Roles are static configuration: built once and shared behind `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentRole {
    /// Stable identifier used to bind tasks
    pub id: &'static str,
    /// Display label, also used as the activity-log agent label
    pub role: &'static str,
    /// What the agent is trying to achieve
    pub goal: &'static str,
    /// Persona text
    pub backstory: &'static str,
    /// Tools the engine may invoke on the agent's behalf
    pub capabilities: Vec<Capability>,
    /// Whether the agent may delegate work to other crew members
    pub allow_delegation: bool,
}

impl AgentRole {
    /// Create a delegating role with every capability granted
    pub fn new(
        id: &'static str,
        role: &'static str,
        goal: &'static str,
        backstory: &'static str,
    ) -> Self {
        Self {
            id,
            role,
            goal,
            backstory,
            capabilities: Capability::ALL.to_vec(),
            allow_delegation: true,
        }
    }

    /// Whether the role may use `capability`
    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grants_all_capabilities() {
        let role = AgentRole::new("risk_advisor", "Risk Advisor", "goal", "backstory");
        assert!(role.can(Capability::Search));
        assert!(role.can(Capability::Scrape));
        assert!(role.allow_delegation);
    }
}
