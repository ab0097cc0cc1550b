use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::errors::AgentResult;
use super::messages::{ChatRequest, ChatResponse};

/// Chat-completion capability the worker agents think with
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Model identifier, for logs
    fn name(&self) -> &str;

    /// Runs one model turn
    async fn complete(&self, request: ChatRequest) -> AgentResult<ChatResponse>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    Standard,
    Hd,
}

/// Parameters for a single image generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub size: String,
    pub quality: ImageQuality,
    pub count: u8,
}

/// Text-to-image capability
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Returns the URL of the first generated image
    async fn generate(&self, request: ImageRequest) -> AgentResult<String>;
}
