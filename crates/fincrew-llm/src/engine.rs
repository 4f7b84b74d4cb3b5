//! Chat-completions execution engine
//!
//! Runs the unit's tasks in order. Each task is one agent loop: the
//! manager's model answers as the task's role, optionally calling the
//! tools the role's capabilities grant, until it produces a final answer.
//! Outputs of earlier tasks are passed to later ones as context.

use crate::client::{ChatMessage, ChatModel, ChatRequest, ToolCall};
use crate::tools::{Tool, Toolbox};
use crate::Result;
use async_trait::async_trait;
use fincrew_core::{
    AgentRole, CrewHooks, CrewOutput, EngineError, ExecutionEngine, ExecutionUnit, ManagerRole,
    Task, TaskOutput, TaskParams,
};
use serde_json::Value;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const FINAL_ANSWER_NUDGE: &str =
    "You have used all available tool calls. Give your best final answer now, without calling tools.";

/// Engine tuning
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Model turns allowed per task before a final answer is demanded
    pub max_iterations: usize,
    /// Max tokens per completion
    pub max_tokens: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_iterations: 8,
            max_tokens: Some(4096),
        }
    }
}

/// [`ExecutionEngine`] backed by a chat-completions model
pub struct LlmCrewEngine {
    model: Arc<dyn ChatModel>,
    toolbox: Toolbox,
    config: EngineConfig,
}

impl LlmCrewEngine {
    pub fn new(model: Arc<dyn ChatModel>, toolbox: Toolbox) -> Self {
        Self {
            model,
            toolbox,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the per-task iteration bound (at least one)
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max.max(1);
        self
    }

    #[instrument(skip_all, fields(task = task.id, agent = task.agent.role))]
    async fn run_task(
        &self,
        manager: &ManagerRole,
        crew: &[Arc<AgentRole>],
        task: &Task,
        context: &[TaskOutput],
    ) -> Result<String> {
        let tools = self.toolbox.for_role(&task.agent);
        let specs: Vec<_> = tools.iter().map(|t| t.definition()).collect();

        let mut messages = vec![
            ChatMessage::system(system_prompt(&task.agent, crew)),
            ChatMessage::user(task_prompt(task, context)),
        ];

        for iteration in 1..=self.config.max_iterations {
            debug!(iteration, tool_count = specs.len(), "Agent iteration started");

            let request = ChatRequest {
                model: manager.model.clone(),
                messages: messages.clone(),
                temperature: Some(manager.temperature),
                max_tokens: self.config.max_tokens,
                tools: (!specs.is_empty()).then(|| specs.clone()),
            };
            let reply = self.model.complete(&request).await?;

            let calls = reply.requested_calls().to_vec();
            if calls.is_empty() {
                let answer = reply.content.unwrap_or_default();
                info!(iteration, response_length = answer.len(), "Task completed");
                return Ok(answer);
            }

            messages.push(reply);
            for call in &calls {
                let result = call_tool(&tools, call).await;
                messages.push(ChatMessage::tool(call.id.clone(), result));
            }
        }

        warn!(
            max_iterations = self.config.max_iterations,
            "Iteration bound reached, requesting final answer"
        );
        messages.push(ChatMessage::user(FINAL_ANSWER_NUDGE));
        let request = ChatRequest {
            model: manager.model.clone(),
            messages,
            temperature: Some(manager.temperature),
            max_tokens: self.config.max_tokens,
            tools: None,
        };
        let reply = self.model.complete(&request).await?;
        Ok(reply.content.unwrap_or_default())
    }
}

#[async_trait]
impl ExecutionEngine for LlmCrewEngine {
    async fn kickoff(
        &self,
        unit: &ExecutionUnit,
        params: &TaskParams,
        hooks: &CrewHooks,
    ) -> std::result::Result<CrewOutput, EngineError> {
        info!(
            crew = unit.name(),
            tasks = unit.len(),
            model = %unit.manager().model,
            "Crew kickoff"
        );

        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(unit.len());
        for task in unit.instantiate(params) {
            hooks.on_agent_start(&task.agent);
            let raw = self
                .run_task(unit.manager(), unit.roles(), &task, &outputs)
                .await?;
            hooks.on_agent_end(&task.agent, &raw);

            outputs.push(TaskOutput {
                task_id: task.id.to_string(),
                agent: task.agent.role.to_string(),
                raw,
            });
        }

        let raw = outputs.last().map(|o| o.raw.clone()).unwrap_or_default();
        Ok(CrewOutput {
            raw,
            tasks_output: outputs,
        })
    }

    fn name(&self) -> &str {
        "llm"
    }
}

/// Run one requested call; failures are reported back to the model as text
async fn call_tool(tools: &[Arc<dyn Tool>], call: &ToolCall) -> String {
    let name = call.function.name.as_str();
    let Some(tool) = tools.iter().find(|t| t.name() == name) else {
        warn!(tool_name = name, "Model requested unavailable tool");
        return format!("Error: tool '{name}' is not available");
    };

    let args: Value = match serde_json::from_str(&call.function.arguments) {
        Ok(args) => args,
        Err(e) => return format!("Error: arguments are not valid JSON: {e}"),
    };

    let start = std::time::Instant::now();
    match tool.execute(args).await {
        Ok(result) => {
            debug!(
                tool_name = name,
                duration_ms = start.elapsed().as_millis() as u64,
                "Tool execution succeeded"
            );
            result.to_string()
        }
        Err(e) => {
            warn!(tool_name = name, error = %e, "Tool execution failed");
            format!("Error: {e}")
        }
    }
}

fn system_prompt(agent: &AgentRole, crew: &[Arc<AgentRole>]) -> String {
    let mut prompt = format!(
        "You are {}. {}\nYour personal goal is: {}",
        agent.role, agent.backstory, agent.goal
    );

    if agent.allow_delegation {
        let coworkers: Vec<&str> = crew
            .iter()
            .filter(|r| r.id != agent.id)
            .map(|r| r.role)
            .collect();
        if !coworkers.is_empty() {
            let _ = write!(
                prompt,
                "\nYou work in a crew coordinated by a manager alongside: {}.",
                coworkers.join(", ")
            );
        }
    }
    prompt
}

fn task_prompt(task: &Task, context: &[TaskOutput]) -> String {
    let mut prompt = format!(
        "Current Task: {}\n\nThis is the expected criteria for your final answer: {}\n\
         You MUST return the actual complete content as the final answer, not a summary.",
        task.description, task.expected_output
    );

    if !context.is_empty() {
        prompt.push_str("\n\nThis is the context you're working with:");
        for output in context {
            let _ = write!(prompt, "\n\n[{}]\n{}", output.agent, output.raw);
        }
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LlmError;
    use fincrew_core::{Capability, LogBroadcaster, TaskTemplate, is_rate_limit_message};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct ScriptedModel {
        replies: Mutex<VecDeque<Result<ChatMessage>>>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedModel {
        fn new(replies: Vec<Result<ChatMessage>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<ChatRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(&self, request: &ChatRequest) -> Result<ChatMessage> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ChatMessage::assistant("fallback")))
        }
    }

    struct Quote;

    #[async_trait]
    impl Tool for Quote {
        async fn execute(&self, params: Value) -> Result<Value> {
            Ok(json!({ "results": [format!("quote for {}", params["query"])] }))
        }
        fn name(&self) -> &str {
            "search_internet"
        }
        fn description(&self) -> &str {
            "search"
        }
        fn input_schema(&self) -> Value {
            json!({"type": "object"})
        }
    }

    fn tool_reply(name: &str, args: &str) -> ChatMessage {
        ChatMessage {
            role: "assistant".into(),
            content: None,
            tool_calls: Some(vec![ToolCall::new("call_1", name, args)]),
            tool_call_id: None,
        }
    }

    fn unit() -> ExecutionUnit {
        let mut researcher = AgentRole::new("researcher", "Researcher", "find", "curious");
        researcher.capabilities = vec![Capability::Search];
        let mut writer = AgentRole::new("writer", "Writer", "write", "clear");
        writer.capabilities.clear();
        writer.allow_delegation = false;

        ExecutionUnit::new(
            "test crew",
            vec![Arc::new(researcher), Arc::new(writer)],
            vec![
                TaskTemplate {
                    id: "research",
                    owner: "researcher",
                    description: "Research {analysis_target}",
                    expected_output: "Notes",
                },
                TaskTemplate {
                    id: "write",
                    owner: "writer",
                    description: "Write about {analysis_target}",
                    expected_output: "Report",
                },
            ],
            ManagerRole {
                model: "gpt-4o-mini".into(),
                temperature: 0.7,
            },
        )
        .unwrap()
    }

    fn engine(model: Arc<ScriptedModel>) -> LlmCrewEngine {
        let toolbox = Toolbox::new().with(Capability::Search, Arc::new(Quote));
        LlmCrewEngine::new(model, toolbox)
    }

    #[tokio::test]
    async fn test_tasks_run_in_order_with_tools_and_context() {
        let model = ScriptedModel::new(vec![
            Ok(tool_reply("search_internet", r#"{"query":"NVDA"}"#)),
            Ok(ChatMessage::assistant("research notes")),
            Ok(ChatMessage::assistant("final report")),
        ]);
        let log = Arc::new(LogBroadcaster::new());
        let hooks = CrewHooks::new(Arc::clone(&log));
        let params = TaskParams::new().with("analysis_target", "NVDA");

        let output = engine(Arc::clone(&model))
            .kickoff(&unit(), &params, &hooks)
            .await
            .unwrap();

        assert_eq!(output.raw, "final report");
        assert_eq!(output.tasks_output.len(), 2);
        assert_eq!(output.tasks_output[0].raw, "research notes");

        let requests = model.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].model, "gpt-4o-mini");
        assert_eq!(requests[0].temperature, Some(0.7));
        assert!(requests[0].tools.is_some());
        assert!(requests[2].tools.is_none());

        // Tool result was fed back on the second turn
        let tool_msg = requests[1].messages.last().unwrap();
        assert_eq!(tool_msg.role, "tool");
        assert!(tool_msg.content.as_deref().unwrap().contains("quote for"));

        // Writer sees the researcher's output as context
        let writer_prompt = requests[2].messages[1].content.clone().unwrap();
        assert!(writer_prompt.contains("Write about NVDA"));
        assert!(writer_prompt.contains("[Researcher]\nresearch notes"));

        let actions: Vec<String> = log
            .get_logs()
            .iter()
            .map(|e| format!("{}|{}", e.agent(), e.action()))
            .collect();
        assert_eq!(
            actions,
            [
                "Researcher|Starting task",
                "Researcher|Completed task",
                "Writer|Starting task",
                "Writer|Completed task",
            ]
        );
    }

    #[tokio::test]
    async fn test_rate_limit_surfaces_as_classifiable_error() {
        let model = ScriptedModel::new(vec![Err(LlmError::RateLimitExceeded(
            "quota".into(),
        ))]);
        let hooks = CrewHooks::new(Arc::new(LogBroadcaster::new()));

        let err = engine(model)
            .kickoff(&unit(), &TaskParams::new(), &hooks)
            .await
            .unwrap_err();
        assert!(is_rate_limit_message(err.message()));
    }

    #[tokio::test]
    async fn test_iteration_bound_forces_final_answer() {
        let model = ScriptedModel::new(vec![
            Ok(tool_reply("search_internet", "{}")),
            Ok(tool_reply("search_internet", "{}")),
            Ok(ChatMessage::assistant("forced")),
            Ok(ChatMessage::assistant("report")),
        ]);
        let hooks = CrewHooks::new(Arc::new(LogBroadcaster::new()));

        let output = engine(Arc::clone(&model))
            .max_iterations(2)
            .kickoff(&unit(), &TaskParams::new(), &hooks)
            .await
            .unwrap();

        assert_eq!(output.tasks_output[0].raw, "forced");
        let requests = model.requests();
        assert!(requests[2].tools.is_none());
        assert_eq!(
            requests[2].messages.last().unwrap().content.as_deref(),
            Some(FINAL_ANSWER_NUDGE)
        );
    }

    #[tokio::test]
    async fn test_tool_failures_are_reported_to_model() {
        let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(Quote)];

        let missing = call_tool(&tools, &ToolCall::new("1", "read_website_content", "{}")).await;
        assert!(missing.contains("not available"));

        let bad_json = call_tool(&tools, &ToolCall::new("2", "search_internet", "{oops")).await;
        assert!(bad_json.starts_with("Error: arguments are not valid JSON"));
    }

    #[test]
    fn test_system_prompt_lists_coworkers_only_when_delegating() {
        let unit = unit();
        let researcher = system_prompt(&unit.roles()[0], unit.roles());
        assert!(researcher.starts_with("You are Researcher. curious"));
        assert!(researcher.contains("alongside: Writer."));

        let writer = system_prompt(&unit.roles()[1], unit.roles());
        assert!(!writer.contains("alongside"));
    }
}
