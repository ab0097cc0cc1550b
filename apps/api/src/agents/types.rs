use serde::{Deserialize, Serialize};

use super::events::ExecutionLog;
use crate::domain::crew::{AgentRole, TaskKey};

/// Output from one task execution, tagged with the agent that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutput {
    pub task: TaskKey,
    pub agent: AgentRole,
    /// The description the agent actually worked from (placeholders filled)
    pub description: String,
    pub raw: String,
}

/// Result of a full crew run
#[derive(Debug, Clone)]
pub struct CrewOutput {
    /// Task outputs in completion order
    pub tasks_output: Vec<TaskOutput>,
    pub log: ExecutionLog,
}

impl CrewOutput {
    /// First output produced by the given role
    pub fn by_role(&self, role: AgentRole) -> Option<&TaskOutput> {
        self.tasks_output.iter().find(|output| output.agent == role)
    }

    pub fn by_task(&self, key: &TaskKey) -> Option<&TaskOutput> {
        self.tasks_output.iter().find(|output| &output.task == key)
    }

    /// Position of a task in completion order
    pub fn completion_index(&self, key: &TaskKey) -> Option<usize> {
        self.tasks_output
            .iter()
            .position(|output| &output.task == key)
    }
}
