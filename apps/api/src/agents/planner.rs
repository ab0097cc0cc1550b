use std::sync::Arc;

use serde::Serialize;

use super::crew::Crew;
use super::errors::{AgentError, AgentResult};
use super::events::ExecutionLog;
use super::llm::LanguageModel;
use super::tools::ToolBox;
use super::types::TaskOutput;
use crate::domain::crew::{registry, AgentRole};
use crate::domain::trip::RunInputs;

/// What a successful planning run hands to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct PlanResult {
    /// Raw itinerary from the Itinerary Planner
    pub itinerary: Option<String>,
    /// Local Expert answer; only set when the user asked a question
    pub expert_answer: Option<String>,
    /// Every task output in completion order
    pub outputs: Vec<TaskOutput>,
    /// Unformatted execution log of the run
    pub log: String,
}

/// Pipeline runner wiring the travel crew to a model and tools
pub struct TripPlanner {
    crew: Crew,
}

impl TripPlanner {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        toolbox: ToolBox,
        max_iterations: usize,
    ) -> AgentResult<Self> {
        let definition = registry::travel_crew().map_err(AgentError::InvalidCrew)?;
        let crew = Crew::new(definition, model, toolbox).with_max_iterations(max_iterations);
        Ok(Self { crew })
    }

    /// Runs research, itinerary and local-expert tasks for one request
    ///
    /// All-or-nothing: any task failure fails the whole plan.
    pub async fn plan(&self, inputs: &RunInputs) -> AgentResult<PlanResult> {
        tracing::info!(
            destination = %inputs.destination(),
            start = %inputs.dates().start(),
            end = %inputs.dates().end(),
            has_question = inputs.has_question(),
            "Planning trip"
        );

        let output = self
            .crew
            .kickoff_with_log(&inputs.variables(), ExecutionLog::new())
            .await?;

        let itinerary = output
            .by_role(AgentRole::ItineraryPlanner)
            .map(|task| task.raw.clone());
        let expert_answer = if inputs.has_question() {
            output
                .by_role(AgentRole::LocalExpert)
                .map(|task| task.raw.clone())
        } else {
            None
        };

        Ok(PlanResult {
            itinerary,
            expert_answer,
            log: output.log.render(),
            outputs: output.tasks_output,
        })
    }
}
