use std::collections::HashMap;
use std::sync::Arc;

use super::errors::{AgentError, AgentResult};
use super::events::{AgentEvent, ExecutionLog};
use super::llm::LanguageModel;
use super::messages::{ChatMessage, ChatRequest, ToolCall, ToolDefinition};
use super::prompts::library;
use super::tools::Tool;
use crate::domain::crew::AgentDescriptor;

/// Default number of tool-calling turns before a final answer is forced
pub const DEFAULT_MAX_ITERATIONS: usize = 15;

/// What a worker is asked to do, with placeholders already filled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub label: String,
    pub description: String,
    pub expected_output: String,
    /// Raw outputs of prerequisite tasks, already joined
    pub context: String,
}

/// Worker Agent that executes one assignment on behalf of an agent role
///
/// The worker runs a bounded tool-calling loop: every model turn may ask for
/// tool calls, whose results are fed back, until the model answers with
/// plain text. Tool failures are reported to the model; model failures end
/// the assignment.
pub struct WorkerAgent {
    agent: AgentDescriptor,
    model: Arc<dyn LanguageModel>,
    tools: Vec<Arc<dyn Tool>>,
    max_iterations: usize,
    log: ExecutionLog,
}

impl WorkerAgent {
    pub fn new(
        agent: AgentDescriptor,
        model: Arc<dyn LanguageModel>,
        tools: Vec<Arc<dyn Tool>>,
        log: ExecutionLog,
    ) -> Self {
        Self {
            agent,
            model,
            tools,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            log,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn agent(&self) -> &AgentDescriptor {
        &self.agent
    }

    /// Names of the tools this worker may call
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    /// Runs the assignment to a final answer
    pub async fn execute(&self, assignment: &Assignment) -> AgentResult<String> {
        let template = library::task_execution();
        let variables = HashMap::from([
            ("role".to_string(), self.agent.role().to_string()),
            ("backstory".to_string(), self.agent.backstory().to_string()),
            ("goal".to_string(), self.agent.goal().to_string()),
            ("description".to_string(), assignment.description.clone()),
            (
                "expected_output".to_string(),
                assignment.expected_output.clone(),
            ),
            (
                "context".to_string(),
                library::context_block(&assignment.context),
            ),
        ]);

        let mut messages = vec![
            ChatMessage::system(template.render_system(&variables)?),
            ChatMessage::user(template.render(&variables)?),
        ];
        let definitions: Vec<ToolDefinition> =
            self.tools.iter().map(|tool| tool.definition()).collect();

        for iteration in 0..self.max_iterations {
            tracing::debug!(
                agent = %self.agent.role(),
                assignment = %assignment.label,
                iteration,
                "Requesting model turn"
            );

            let response = self
                .model
                .complete(ChatRequest {
                    messages: messages.clone(),
                    tools: definitions.clone(),
                })
                .await?;

            if !response.wants_tools() {
                return self.final_answer(response.content);
            }

            let thought = response.content.unwrap_or_default();
            if !thought.trim().is_empty() {
                self.log.record(AgentEvent::AgentThought {
                    agent: self.agent.role(),
                    text: thought.clone(),
                });
            }

            messages.push(ChatMessage::assistant(thought, response.tool_calls.clone()));
            for call in &response.tool_calls {
                let result = self.run_tool(call).await;
                messages.push(ChatMessage::tool(call.id.clone(), result));
            }
        }

        tracing::warn!(
            agent = %self.agent.role(),
            assignment = %assignment.label,
            max_iterations = self.max_iterations,
            "Tool budget exhausted, forcing final answer"
        );
        messages.push(ChatMessage::user(
            library::final_answer().render(&HashMap::new())?,
        ));

        let response = self
            .model
            .complete(ChatRequest {
                messages,
                tools: Vec::new(),
            })
            .await?;

        self.final_answer(response.content)
    }

    fn final_answer(&self, content: Option<String>) -> AgentResult<String> {
        content
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                AgentError::LlmError(format!(
                    "{} received an empty answer from {}",
                    self.agent.role(),
                    self.model.name()
                ))
            })
    }

    /// Invokes one tool call; the returned text is what the model sees
    async fn run_tool(&self, call: &ToolCall) -> String {
        let role = self.agent.role();

        let Some(tool) = self.tools.iter().find(|tool| tool.name() == call.name) else {
            let error = format!(
                "Tool '{}' does not exist. Available tools: {}",
                call.name,
                self.tool_names().join(", ")
            );
            self.log.record(AgentEvent::ToolFailed {
                agent: role,
                tool: call.name.clone(),
                error: error.clone(),
            });
            return format!("Error: {}", error);
        };

        self.log.record(AgentEvent::ToolInvoked {
            agent: role,
            tool: call.name.clone(),
            input: call.arguments.clone(),
        });

        let outcome = match serde_json::from_str::<serde_json::Value>(&call.arguments) {
            Ok(arguments) => tool.invoke(arguments).await,
            Err(e) => Err(AgentError::ToolFailed {
                tool: call.name.clone(),
                message: format!("arguments are not valid JSON: {}", e),
            }),
        };

        match outcome {
            Ok(output) => {
                self.log.record(AgentEvent::ToolFinished {
                    agent: role,
                    tool: call.name.clone(),
                    output: output.clone(),
                });
                output
            }
            Err(e) => {
                self.log.record(AgentEvent::ToolFailed {
                    agent: role,
                    tool: call.name.clone(),
                    error: e.to_string(),
                });
                format!("Error: {}", e)
            }
        }
    }
}
