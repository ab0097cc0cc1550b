use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};

use super::delegation::DelegateWorkTool;
use super::errors::{AgentError, AgentResult};
use super::events::{AgentEvent, ExecutionLog};
use super::llm::LanguageModel;
use super::state::{CrewState, TaskStatus};
use super::tools::{Tool, ToolBox};
use super::types::{CrewOutput, TaskOutput};
use super::worker::{Assignment, WorkerAgent, DEFAULT_MAX_ITERATIONS};
use crate::domain::crew::{render_template, CrewDefinition, TaskDescriptor};

/// Separator between prerequisite outputs in a task's context
const CONTEXT_SEPARATOR: &str = "\n\n";

/// Orchestration engine for a crew definition
///
/// `kickoff` fills every template, then runs tasks as soon as their context
/// tasks have completed. Tasks flagged `async_execution` run concurrently
/// with anything else; synchronous tasks run one at a time, earliest
/// declared first. The first task failure aborts the run: tasks still in
/// flight are dropped and no partial output is returned.
pub struct Crew {
    definition: Arc<CrewDefinition>,
    model: Arc<dyn LanguageModel>,
    toolbox: ToolBox,
    max_iterations: usize,
}

type TaskFuture = BoxFuture<'static, (usize, AgentResult<String>)>;

impl Crew {
    pub fn new(definition: CrewDefinition, model: Arc<dyn LanguageModel>, toolbox: ToolBox) -> Self {
        Self {
            definition: Arc::new(definition),
            model,
            toolbox,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn definition(&self) -> &CrewDefinition {
        &self.definition
    }

    /// Runs every task with the given placeholder values
    pub async fn kickoff(&self, inputs: &HashMap<String, String>) -> AgentResult<CrewOutput> {
        self.kickoff_with_log(inputs, ExecutionLog::new()).await
    }

    /// Same as `kickoff`, recording into a caller-provided log
    pub async fn kickoff_with_log(
        &self,
        inputs: &HashMap<String, String>,
        log: ExecutionLog,
    ) -> AgentResult<CrewOutput> {
        let tasks = self.definition.tasks();
        let assignments = self.render_assignments(inputs)?;

        log.record(AgentEvent::CrewStarted {
            task_count: tasks.len(),
        });

        let mut state = CrewState::new(tasks);
        let mut raw_outputs: HashMap<usize, String> = HashMap::new();
        let mut tasks_output: Vec<TaskOutput> = Vec::with_capacity(tasks.len());
        let mut in_flight: FuturesUnordered<TaskFuture> = FuturesUnordered::new();
        let mut sync_running = false;

        loop {
            for (index, task) in tasks.iter().enumerate() {
                if !state.is_ready(task) {
                    continue;
                }
                if !task.async_execution() {
                    if sync_running {
                        continue;
                    }
                    sync_running = true;
                }

                let mut assignment = assignments[index].clone();
                assignment.context = self.context_for(task, &raw_outputs);

                let worker = self.worker_for(task, &log)?;
                state.transition(task.key(), TaskStatus::Running)?;
                log.record(AgentEvent::TaskStarted {
                    task: task.key().to_string(),
                    agent: task.agent(),
                });

                in_flight.push(Box::pin(async move {
                    let result = worker.execute(&assignment).await;
                    (index, result)
                }));
            }

            let Some((index, result)) = in_flight.next().await else {
                break;
            };

            let task = &tasks[index];
            if !task.async_execution() {
                sync_running = false;
            }

            match result {
                Ok(raw) => {
                    state.transition(task.key(), TaskStatus::Completed)?;
                    log.record(AgentEvent::TaskCompleted {
                        task: task.key().to_string(),
                        agent: task.agent(),
                        output: raw.clone(),
                    });
                    tasks_output.push(TaskOutput {
                        task: task.key().clone(),
                        agent: task.agent(),
                        description: assignments[index].description.clone(),
                        raw: raw.clone(),
                    });
                    raw_outputs.insert(index, raw);
                }
                Err(error) => {
                    state.transition(task.key(), TaskStatus::Failed)?;
                    log.record(AgentEvent::TaskFailed {
                        task: task.key().to_string(),
                        agent: task.agent(),
                        error: error.to_string(),
                    });
                    tracing::error!(task = %task.key(), error = %error, "Crew run aborted");
                    return Err(AgentError::in_task(task.key().to_string(), error));
                }
            }
        }

        if !state.all_completed() {
            return Err(AgentError::InvalidCrew(format!(
                "{} tasks could never be scheduled",
                state.count(TaskStatus::Pending)
            )));
        }

        log.record(AgentEvent::CrewFinished {
            completed: tasks_output.len(),
        });

        Ok(CrewOutput { tasks_output, log })
    }

    /// Fills every task template up front so a templating mistake fails the
    /// run before any model call
    fn render_assignments(&self, inputs: &HashMap<String, String>) -> AgentResult<Vec<Assignment>> {
        self.definition
            .tasks()
            .iter()
            .map(|task| {
                let key = task.key().to_string();
                let description = render_template(task.description(), inputs)
                    .map_err(|e| AgentError::in_task(key.clone(), e.into()))?;
                let expected_output = render_template(task.expected_output(), inputs)
                    .map_err(|e| AgentError::in_task(key.clone(), e.into()))?;
                Ok(Assignment {
                    label: key,
                    description,
                    expected_output,
                    context: String::new(),
                })
            })
            .collect()
    }

    fn context_for(&self, task: &TaskDescriptor, raw_outputs: &HashMap<usize, String>) -> String {
        task.context()
            .iter()
            .filter_map(|dependency| {
                self.definition
                    .tasks()
                    .iter()
                    .position(|candidate| candidate.key() == dependency)
                    .and_then(|index| raw_outputs.get(&index))
                    .map(String::as_str)
            })
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR)
    }

    fn worker_for(&self, task: &TaskDescriptor, log: &ExecutionLog) -> AgentResult<WorkerAgent> {
        let agent = self
            .definition
            .agent(task.agent())
            .ok_or_else(|| AgentError::AgentNotFound(task.agent().to_string()))?
            .clone();

        // Task-level tools replace the agent's tools when given
        let kinds = if task.tools().is_empty() {
            agent.tools()
        } else {
            task.tools()
        };
        let mut tools: Vec<Arc<dyn Tool>> = self.toolbox.resolve(kinds)?;

        if agent.allow_delegation() {
            let coworkers = self
                .definition
                .agents()
                .iter()
                .filter(|other| other.role() != agent.role())
                .cloned()
                .collect::<Vec<_>>();
            if !coworkers.is_empty() {
                tools.push(Arc::new(DelegateWorkTool::new(
                    agent.role(),
                    coworkers,
                    self.model.clone(),
                    self.toolbox.clone(),
                    self.max_iterations,
                    log.clone(),
                )));
            }
        }

        Ok(
            WorkerAgent::new(agent, self.model.clone(), tools, log.clone())
                .with_max_iterations(self.max_iterations),
        )
    }
}
