use std::collections::HashSet;

use super::agent::{AgentDescriptor, AgentRole};
use super::task::{TaskDescriptor, TaskKey};
use super::template::placeholders;

/// A validated set of agents and the tasks assigned to them
///
/// # Invariants
/// - Agent roles are unique
/// - Task keys are unique
/// - Every task is assigned to a registered agent
/// - Every context entry names a task declared *earlier*, so the task
///   graph is acyclic by construction and declaration order is a valid
///   topological order
#[derive(Debug, Clone)]
pub struct CrewDefinition {
    agents: Vec<AgentDescriptor>,
    tasks: Vec<TaskDescriptor>,
}

impl CrewDefinition {
    /// Validates and builds a crew definition
    ///
    /// # Returns
    /// * `Ok(CrewDefinition)` - If all invariants hold
    /// * `Err(String)` - Description of the first violated invariant
    pub fn new(agents: Vec<AgentDescriptor>, tasks: Vec<TaskDescriptor>) -> Result<Self, String> {
        if tasks.is_empty() {
            return Err("Crew must have at least one task".to_string());
        }

        let mut roles = HashSet::new();
        for agent in &agents {
            if !roles.insert(agent.role()) {
                return Err(format!("Agent '{}' is registered twice", agent.role()));
            }
        }

        let mut declared: HashSet<&TaskKey> = HashSet::new();
        for task in &tasks {
            if !roles.contains(&task.agent()) {
                return Err(format!(
                    "Task '{}' is assigned to unregistered agent '{}'",
                    task.key(),
                    task.agent()
                ));
            }

            for dependency in task.context() {
                if dependency == task.key() {
                    return Err(format!("Task '{}' depends on itself", task.key()));
                }
                if !declared.contains(dependency) {
                    return Err(format!(
                        "Task '{}' depends on '{}', which is not declared before it",
                        task.key(),
                        dependency
                    ));
                }
            }

            if !declared.insert(task.key()) {
                return Err(format!("Task '{}' is declared twice", task.key()));
            }
        }

        Ok(Self { agents, tasks })
    }

    pub fn agents(&self) -> &[AgentDescriptor] {
        &self.agents
    }

    pub fn tasks(&self) -> &[TaskDescriptor] {
        &self.tasks
    }

    pub fn agent(&self, role: AgentRole) -> Option<&AgentDescriptor> {
        self.agents.iter().find(|agent| agent.role() == role)
    }

    pub fn task(&self, key: &TaskKey) -> Option<&TaskDescriptor> {
        self.tasks.iter().find(|task| task.key() == key)
    }

    /// Every placeholder referenced by any task template
    pub fn placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for task in &self.tasks {
            for name in placeholders(task.description())
                .into_iter()
                .chain(placeholders(task.expected_output()))
            {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}
