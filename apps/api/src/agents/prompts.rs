// Prompt templates for LLM interactions
//
// This module contains all prompt templates used by the agent system.
// Prompts are versioned for reproducibility.

use std::collections::HashMap;

use crate::domain::crew::{render_template, TemplateError};

/// Prompt template structure
pub struct PromptTemplate {
    pub name: String,
    pub version: String,
    pub system: String,
    pub user_template: String,
}

impl PromptTemplate {
    /// Render the system prompt with variables
    pub fn render_system(
        &self,
        variables: &HashMap<String, String>,
    ) -> Result<String, TemplateError> {
        render_template(&self.system, variables)
    }

    /// Render the user template with variables
    pub fn render(&self, variables: &HashMap<String, String>) -> Result<String, TemplateError> {
        render_template(&self.user_template, variables)
    }
}

pub mod library {
    use super::PromptTemplate;

    /// Expected output used when an agent answers a coworker
    pub const DELEGATED_EXPECTED_OUTPUT: &str =
        "Your best answer to your coworker asking you this, accounting for the context shared.";

    /// Variables: role, backstory, goal, description, expected_output, context
    pub fn task_execution() -> PromptTemplate {
        PromptTemplate {
            name: "task_execution".to_string(),
            version: "1.0.0".to_string(),
            system: "You are {{role}}. {{backstory}}\n\
                     Your personal goal is: {{goal}}\n\
                     Use the tools available to you whenever they help. When you have \
                     everything you need, reply with your complete final answer and nothing else."
                .to_string(),
            user_template: "Current Task: {{description}}\n\n\
                            This is the expected criteria for your final answer: {{expected_output}}\n\
                            You MUST return the actual complete content as the final answer, not a summary.\
                            {{context}}\n\n\
                            Begin! This is VERY important to you, use the tools available and give your \
                            best Final Answer, your job depends on it!"
                .to_string(),
        }
    }

    /// Wraps context from earlier tasks; empty context renders to nothing
    pub fn context_block(context: &str) -> String {
        if context.trim().is_empty() {
            String::new()
        } else {
            format!("\n\nThis is the context you're working with:\n{}", context)
        }
    }

    /// Sent once the tool-calling budget is spent
    pub fn final_answer() -> PromptTemplate {
        PromptTemplate {
            name: "final_answer".to_string(),
            version: "1.0.0".to_string(),
            system: String::new(),
            user_template: "You have reached the maximum number of tool uses. \
                            Do not call any more tools. Give your complete final answer now, \
                            based on everything gathered so far."
                .to_string(),
        }
    }

    /// Variables: coworkers
    pub fn delegate_work_description() -> PromptTemplate {
        PromptTemplate {
            name: "delegate_work".to_string(),
            version: "1.0.0".to_string(),
            system: String::new(),
            user_template: "Delegate a specific task to one of the following coworkers: {{coworkers}}. \
                            The input to this tool should be the coworker, the task you want them to do, \
                            and ALL necessary context to execute the task; they know nothing about the \
                            task, so share absolutely everything you know, don't reference things but \
                            instead explain them."
                .to_string(),
        }
    }
}
