// Agent event system
//
// Everything the crew does during a run is recorded as an AgentEvent. The
// ExecutionLog collects them so the web layer can show the unformatted
// "thought process" of a run, and mirrors each one to tracing.

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::crew::AgentRole;

/// Longest tool output / model text kept in a single log line
const PREVIEW_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    CrewStarted { task_count: usize },
    TaskStarted { task: String, agent: AgentRole },
    AgentThought { agent: AgentRole, text: String },
    ToolInvoked { agent: AgentRole, tool: String, input: String },
    ToolFinished { agent: AgentRole, tool: String, output: String },
    ToolFailed { agent: AgentRole, tool: String, error: String },
    Delegated { from: AgentRole, to: AgentRole, task: String },
    TaskCompleted { task: String, agent: AgentRole, output: String },
    TaskFailed { task: String, agent: AgentRole, error: String },
    CrewFinished { completed: usize },
}

impl fmt::Display for AgentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentEvent::CrewStarted { task_count } => {
                write!(f, "Crew started with {} tasks", task_count)
            }
            AgentEvent::TaskStarted { task, agent } => {
                write!(f, "[{}] Working on task '{}'", agent, task)
            }
            AgentEvent::AgentThought { agent, text } => {
                write!(f, "[{}] Thought: {}", agent, preview(text))
            }
            AgentEvent::ToolInvoked { agent, tool, input } => {
                write!(f, "[{}] Using tool {} with input {}", agent, tool, input)
            }
            AgentEvent::ToolFinished { agent, tool, output } => {
                write!(f, "[{}] Tool {} returned: {}", agent, tool, preview(output))
            }
            AgentEvent::ToolFailed { agent, tool, error } => {
                write!(f, "[{}] Tool {} failed: {}", agent, tool, error)
            }
            AgentEvent::Delegated { from, to, task } => {
                write!(f, "[{}] Delegating to {}: {}", from, to, preview(task))
            }
            AgentEvent::TaskCompleted { task, agent, output } => {
                write!(f, "[{}] Final answer for '{}':\n{}", agent, task, output)
            }
            AgentEvent::TaskFailed { task, agent, error } => {
                write!(f, "[{}] Task '{}' failed: {}", agent, task, error)
            }
            AgentEvent::CrewFinished { completed } => {
                write!(f, "Crew finished, {} tasks completed", completed)
            }
        }
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", cut)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub event: AgentEvent,
}

/// Shared, append-only capture of one run's events
///
/// Cloning is cheap and every clone appends to the same buffer, so
/// concurrently running tasks can all record into one log.
#[derive(Debug, Clone, Default)]
pub struct ExecutionLog {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: AgentEvent) {
        tracing::info!(target: "tripcrew::crew", "{}", event);
        let entry = LogEntry {
            at: Utc::now(),
            event,
        };
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry);
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Plain text rendering, one timestamped event per line
    pub fn render(&self) -> String {
        self.entries()
            .iter()
            .map(|entry| format!("{} {}", entry.at.format("%H:%M:%S%.3f"), entry.event))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
