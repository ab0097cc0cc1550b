// Task state tracking for a single crew run

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::errors::{AgentError, AgentResult};
use crate::domain::crew::{TaskDescriptor, TaskKey};

/// Lifecycle status of a task within one run
///
/// # Status Transitions
/// ```text
/// Pending -> Running -> Completed
///                  \--> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        matches!(
            (self, next),
            (Pending, Running) | (Running, Completed) | (Running, Failed)
        )
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Status of every task in a run
#[derive(Debug, Clone, Default)]
pub struct CrewState {
    statuses: HashMap<TaskKey, TaskStatus>,
}

impl CrewState {
    pub fn new<'a>(tasks: impl IntoIterator<Item = &'a TaskDescriptor>) -> Self {
        Self {
            statuses: tasks
                .into_iter()
                .map(|task| (task.key().clone(), TaskStatus::Pending))
                .collect(),
        }
    }

    pub fn status(&self, key: &TaskKey) -> Option<TaskStatus> {
        self.statuses.get(key).copied()
    }

    pub fn transition(&mut self, key: &TaskKey, next: TaskStatus) -> AgentResult<()> {
        let current = self
            .statuses
            .get_mut(key)
            .ok_or_else(|| AgentError::InvalidCrew(format!("Unknown task '{}'", key)))?;

        if !current.can_transition_to(next) {
            return Err(AgentError::InvalidStateTransition {
                from: current.to_string(),
                to: next.to_string(),
            });
        }

        *current = next;
        Ok(())
    }

    /// A pending task whose context tasks have all completed
    pub fn is_ready(&self, task: &TaskDescriptor) -> bool {
        self.status(task.key()) == Some(TaskStatus::Pending)
            && task
                .context()
                .iter()
                .all(|dep| self.status(dep) == Some(TaskStatus::Completed))
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        self.statuses.values().filter(|s| **s == status).count()
    }

    pub fn all_completed(&self) -> bool {
        self.count(TaskStatus::Completed) == self.statuses.len()
    }
}
