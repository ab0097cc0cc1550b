use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::wire::{
    ChatCompletionRequest, ChatCompletionResponse, ErrorEnvelope, ImageGenerationRequest,
    ImageGenerationResponse, WireMessage, WireTool,
};
use crate::agents::errors::{AgentError, AgentResult};
use crate::agents::llm::{ImageGenerator, ImageRequest, LanguageModel};
use crate::agents::messages::{ChatRequest, ChatResponse};
use crate::config::OpenAiConfig;

/// Client for an OpenAI-compatible API
///
/// Serves both as the crew's language model and as the image generator.
/// A missing API key is only reported when a call is made.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

/// Which capability a call belongs to, so failures map to the right error
#[derive(Debug, Clone, Copy)]
enum Capability {
    Chat,
    Image,
}

impl OpenAiClient {
    pub fn new(client: Client, config: OpenAiConfig) -> Self {
        Self { client, config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn error(capability: Capability, message: String) -> AgentError {
        match capability {
            Capability::Chat => AgentError::LlmError(message),
            Capability::Image => AgentError::ImageError(message),
        }
    }

    async fn post<B, R>(&self, capability: Capability, path: &str, body: &B) -> AgentResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| AgentError::ConfigError("OPENAI_API_KEY is not set".to_string()))?;

        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| Self::error(capability, format!("request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Self::error(capability, format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(text);
            return Err(Self::error(
                capability,
                format!("API error ({}): {}", status, message),
            ));
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: ChatRequest) -> AgentResult<ChatResponse> {
        let body = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: request.messages.iter().map(WireMessage::from).collect(),
            tools: request.tools.iter().map(WireTool::from).collect(),
        };

        let response: ChatCompletionResponse =
            self.post(Capability::Chat, "chat/completions", &body).await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| ChatResponse::from(choice.message))
            .ok_or_else(|| AgentError::LlmError("response contained no choices".to_string()))
    }
}

#[async_trait]
impl ImageGenerator for OpenAiClient {
    async fn generate(&self, request: ImageRequest) -> AgentResult<String> {
        let body = ImageGenerationRequest::new(&self.config.image_model, request);

        let response: ImageGenerationResponse = self
            .post(Capability::Image, "images/generations", &body)
            .await?;

        response
            .data
            .into_iter()
            .find_map(|image| image.url)
            .ok_or_else(|| AgentError::ImageError("response contained no image URL".to_string()))
    }
}
