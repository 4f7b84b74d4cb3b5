//! Execution unit submitted to an engine

use serde::Serialize;
use std::sync::Arc;

use crate::error::{CrewError, Result};
use crate::role::AgentRole;
use crate::task::{Task, TaskParams, TaskTemplate};

/// How crew members coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Process {
    /// A manager delegates tasks across the listed agents
    #[default]
    Hierarchical,
}

/// Coordinator responsible for delegation; not one of the listed agents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManagerRole {
    /// Model identifier driving the manager
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
}

/// Ordered agents, their bound tasks and the coordinating manager
///
/// `roles[i]` owns `tasks[i]`. Units are built per run and not reused.
#[derive(Debug, Clone)]
pub struct ExecutionUnit {
    name: String,
    roles: Vec<Arc<AgentRole>>,
    tasks: Vec<TaskTemplate>,
    manager: ManagerRole,
    process: Process,
}

impl ExecutionUnit {
    /// Bind `tasks` to `roles` index by index
    ///
    /// Fails if the sequences differ in length or a task is owned by a
    /// different role than the one at its index.
    pub fn new(
        name: impl Into<String>,
        roles: Vec<Arc<AgentRole>>,
        tasks: Vec<TaskTemplate>,
        manager: ManagerRole,
    ) -> Result<Self> {
        if roles.len() != tasks.len() {
            return Err(CrewError::Assembly(format!(
                "{} roles but {} tasks",
                roles.len(),
                tasks.len()
            )));
        }

        if let Some((role, task)) = roles
            .iter()
            .zip(&tasks)
            .find(|(role, task)| role.id != task.owner)
        {
            return Err(CrewError::Assembly(format!(
                "task '{}' is owned by '{}' but bound to '{}'",
                task.id, task.owner, role.id
            )));
        }

        Ok(Self {
            name: name.into(),
            roles,
            tasks,
            manager,
            process: Process::Hierarchical,
        })
    }

    /// Unit label (e.g. the analysis mode)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Agents in execution order
    pub fn roles(&self) -> &[Arc<AgentRole>] {
        &self.roles
    }

    /// Task templates in execution order
    pub fn tasks(&self) -> &[TaskTemplate] {
        &self.tasks
    }

    /// The coordinating manager
    pub fn manager(&self) -> &ManagerRole {
        &self.manager
    }

    /// Coordination strategy
    pub fn process(&self) -> Process {
        self.process
    }

    /// Number of agent/task pairs
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Whether the unit holds no work
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Instantiate every task for one run, in order
    pub fn instantiate(&self, params: &TaskParams) -> Vec<Task> {
        self.roles
            .iter()
            .zip(&self.tasks)
            .map(|(role, template)| template.instantiate(Arc::clone(role), params))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(id: &'static str) -> Arc<AgentRole> {
        Arc::new(AgentRole::new(id, id, "goal", "backstory"))
    }

    fn task(id: &'static str, owner: &'static str) -> TaskTemplate {
        TaskTemplate {
            id,
            owner,
            description: "Work on {analysis_target}",
            expected_output: "Report",
        }
    }

    fn manager() -> ManagerRole {
        ManagerRole {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
        }
    }

    #[test]
    fn test_binds_in_order() {
        let unit = ExecutionUnit::new(
            "single",
            vec![role("a"), role("b")],
            vec![task("t1", "a"), task("t2", "b")],
            manager(),
        )
        .unwrap();

        assert_eq!(unit.len(), 2);
        assert_eq!(unit.process(), Process::Hierarchical);

        let tasks = unit.instantiate(&TaskParams::new().with("analysis_target", "TSLA"));
        assert_eq!(tasks[0].agent.id, "a");
        assert_eq!(tasks[1].id, "t2");
        assert_eq!(tasks[1].description, "Work on TSLA");
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = ExecutionUnit::new("x", vec![role("a")], vec![], manager()).unwrap_err();
        assert!(matches!(err, CrewError::Assembly(_)));
    }

    #[test]
    fn test_owner_mismatch_rejected() {
        let err = ExecutionUnit::new(
            "x",
            vec![role("a"), role("b")],
            vec![task("t1", "b"), task("t2", "a")],
            manager(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("'t1'"));
    }
}
