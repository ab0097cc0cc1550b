use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::agent::AgentRole;
use super::tool::ToolKind;

/// Identifier of a task within a crew
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskKey(String);

impl TaskKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Immutable definition of a unit of work
///
/// `description` and `expected_output` are templates; their `{{name}}`
/// placeholders are filled from the run inputs when the crew is kicked off.
/// `context` lists the tasks whose raw output is handed to this task, which
/// also makes them hard prerequisites.
///
/// # Example
/// ```
/// use tripcrew_api::domain::crew::{AgentRole, TaskDescriptor};
///
/// let task = TaskDescriptor::new(
///     "itinerary",
///     AgentRole::ItineraryPlanner,
///     "Plan a trip to {{destination}}",
///     "A day-by-day itinerary.",
/// )
/// .with_context(["research"]);
///
/// assert_eq!(task.context().len(), 1);
/// assert!(!task.async_execution());
/// ```
#[derive(Debug, Clone)]
pub struct TaskDescriptor {
    key: TaskKey,
    agent: AgentRole,
    description: String,
    expected_output: String,
    tools: BTreeSet<ToolKind>,
    context: Vec<TaskKey>,
    async_execution: bool,
}

impl TaskDescriptor {
    pub fn new(
        key: impl Into<TaskKey>,
        agent: AgentRole,
        description: impl Into<String>,
        expected_output: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            agent,
            description: description.into(),
            expected_output: expected_output.into(),
            tools: BTreeSet::new(),
            context: Vec::new(),
            async_execution: false,
        }
    }

    pub fn with_tools(mut self, tools: impl IntoIterator<Item = ToolKind>) -> Self {
        self.tools.extend(tools);
        self
    }

    /// Declares the tasks this one depends on, in the order their outputs
    /// should appear in the context
    pub fn with_context<K: Into<TaskKey>>(mut self, context: impl IntoIterator<Item = K>) -> Self {
        for key in context {
            let key = key.into();
            if !self.context.contains(&key) {
                self.context.push(key);
            }
        }
        self
    }

    /// Marks the task as eligible to run concurrently with others
    pub fn with_async_execution(mut self, async_execution: bool) -> Self {
        self.async_execution = async_execution;
        self
    }

    pub fn key(&self) -> &TaskKey {
        &self.key
    }

    pub fn agent(&self) -> AgentRole {
        self.agent
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn expected_output(&self) -> &str {
        &self.expected_output
    }

    pub fn tools(&self) -> &BTreeSet<ToolKind> {
        &self.tools
    }

    pub fn context(&self) -> &[TaskKey] {
        &self.context
    }

    pub fn async_execution(&self) -> bool {
        self.async_execution
    }
}

impl From<String> for TaskKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&TaskKey> for TaskKey {
    fn from(key: &TaskKey) -> Self {
        key.clone()
    }
}
