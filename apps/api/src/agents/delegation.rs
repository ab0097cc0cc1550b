use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::errors::{AgentError, AgentResult};
use super::events::{AgentEvent, ExecutionLog};
use super::llm::LanguageModel;
use super::prompts::library;
use super::tools::{string_argument, Tool, ToolBox};
use super::worker::{Assignment, WorkerAgent};
use crate::domain::crew::{AgentDescriptor, AgentRole};

/// Lets an agent with `allow_delegation` hand work to a coworker
///
/// The coworker runs a single assignment with its own tools and without
/// delegation of its own, so delegation never recurses.
pub struct DelegateWorkTool {
    from: AgentRole,
    coworkers: Vec<AgentDescriptor>,
    model: Arc<dyn LanguageModel>,
    toolbox: ToolBox,
    max_iterations: usize,
    log: ExecutionLog,
}

impl DelegateWorkTool {
    pub const NAME: &'static str = "delegate_work";

    pub fn new(
        from: AgentRole,
        coworkers: Vec<AgentDescriptor>,
        model: Arc<dyn LanguageModel>,
        toolbox: ToolBox,
        max_iterations: usize,
        log: ExecutionLog,
    ) -> Self {
        Self {
            from,
            coworkers,
            model,
            toolbox,
            max_iterations,
            log,
        }
    }

    fn coworker_names(&self) -> Vec<&'static str> {
        self.coworkers.iter().map(|agent| agent.role().name()).collect()
    }
}

#[async_trait]
impl Tool for DelegateWorkTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> String {
        let variables = HashMap::from([(
            "coworkers".to_string(),
            self.coworker_names().join(", "),
        )]);
        library::delegate_work_description()
            .render(&variables)
            .unwrap_or_else(|_| "Delegate a task to a coworker.".to_string())
    }

    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "coworker": {
                    "type": "string",
                    "enum": self.coworker_names(),
                    "description": "The role of the coworker to delegate to"
                },
                "task": {
                    "type": "string",
                    "description": "The task to delegate"
                },
                "context": {
                    "type": "string",
                    "description": "All the context needed to execute the task"
                }
            },
            "required": ["coworker", "task", "context"]
        })
    }

    async fn invoke(&self, arguments: serde_json::Value) -> AgentResult<String> {
        let requested = string_argument(Self::NAME, &arguments, "coworker")?;
        let task = string_argument(Self::NAME, &arguments, "task")?;
        let context = arguments
            .get("context")
            .and_then(|value| value.as_str())
            .unwrap_or_default()
            .to_string();

        let coworker = AgentRole::from_name(&requested)
            .and_then(|role| self.coworkers.iter().find(|agent| agent.role() == role))
            .ok_or_else(|| {
                AgentError::AgentNotFound(format!(
                    "'{}'; choose one of: {}",
                    requested,
                    self.coworker_names().join(", ")
                ))
            })?
            .clone();

        self.log.record(AgentEvent::Delegated {
            from: self.from,
            to: coworker.role(),
            task: task.clone(),
        });

        let tools = self.toolbox.resolve(coworker.tools())?;
        let worker = WorkerAgent::new(coworker, self.model.clone(), tools, self.log.clone())
            .with_max_iterations(self.max_iterations);

        worker
            .execute(&Assignment {
                label: format!("delegated by {}", self.from),
                description: task,
                expected_output: library::DELEGATED_EXPECTED_OUTPUT.to_string(),
                context,
            })
            .await
    }
}
