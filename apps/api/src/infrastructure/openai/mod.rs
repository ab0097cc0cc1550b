// OpenAI-compatible adapter for the agent system's model and image ports

pub mod client;
pub mod wire;

pub use client::OpenAiClient;
