// Agent system modules
//
// Crew orchestration: worker agents run tasks against a language model
// with tools, and the crew executor wires task outputs into dependent tasks.

pub mod crew;
pub mod delegation;
pub mod errors;
pub mod events;
pub mod imagery;
pub mod llm;
pub mod messages;
pub mod planner;
pub mod prompts;
pub mod state;
pub mod tools;
pub mod types;
pub mod worker;

// Re-export main types
pub use crew::Crew;
pub use errors::{AgentError, AgentResult};
pub use events::{AgentEvent, ExecutionLog};
pub use llm::{ImageGenerator, LanguageModel};
pub use planner::{PlanResult, TripPlanner};
pub use tools::{Tool, ToolBox};
pub use types::{CrewOutput, TaskOutput};
pub use worker::WorkerAgent;
