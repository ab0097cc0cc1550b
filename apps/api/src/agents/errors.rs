use thiserror::Error;

use crate::domain::crew::TemplateError;

/// Errors that can occur in the agent system
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("LLM API error: {0}")]
    LlmError(String),

    #[error("Image generation error: {0}")]
    ImageError(String),

    #[error("Tool '{tool}' failed: {message}")]
    ToolFailed { tool: String, message: String },

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    TemplateError(#[from] TemplateError),

    #[error("Invalid crew: {0}")]
    InvalidCrew(String),

    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("Task '{task}' failed: {source}")]
    TaskExecutionFailed {
        task: String,
        #[source]
        source: Box<AgentError>,
    },

    #[error("Invalid task state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AgentError {
    /// Wraps an error with the key of the task it aborted
    pub fn in_task(task: impl Into<String>, source: AgentError) -> Self {
        AgentError::TaskExecutionFailed {
            task: task.into(),
            source: Box::new(source),
        }
    }
}

pub type AgentResult<T> = Result<T, AgentError>;
