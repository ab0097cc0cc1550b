pub mod agent;
pub mod definition;
pub mod registry;
pub mod task;
pub mod template;
pub mod tool;

pub use agent::{AgentDescriptor, AgentRole};
pub use definition::CrewDefinition;
pub use task::{TaskDescriptor, TaskKey};
pub use template::{render_template, TemplateError};
pub use tool::ToolKind;
