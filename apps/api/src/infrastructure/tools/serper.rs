use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::agents::errors::{AgentError, AgentResult};
use crate::agents::tools::{string_argument, Tool};
use crate::config::SerperConfig;

const RESULT_COUNT: usize = 10;

/// Web search through the Serper API
#[derive(Debug, Clone)]
pub struct SerperSearchTool {
    client: Client,
    config: SerperConfig,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
    num: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub organic: Vec<OrganicResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrganicResult {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

impl SerperSearchTool {
    pub const NAME: &'static str = "web_search";

    pub fn new(client: Client, config: SerperConfig) -> Self {
        Self { client, config }
    }

    fn failure(message: impl Into<String>) -> AgentError {
        AgentError::ToolFailed {
            tool: Self::NAME.to_string(),
            message: message.into(),
        }
    }
}

/// Formats ranked results as plain text for the model
pub fn format_results(query: &str, results: &[OrganicResult]) -> String {
    if results.is_empty() {
        return format!("No results found for '{}'.", query);
    }

    let mut text = format!("Search results for '{}':\n", query);
    for result in results.iter().take(RESULT_COUNT) {
        text.push_str(&format!(
            "Title: {}\nLink: {}\nSnippet: {}\n---\n",
            result.title, result.link, result.snippet
        ));
    }
    text
}

#[async_trait]
impl Tool for SerperSearchTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> String {
        "Search the internet for a query and return the top results with titles, links and \
         snippets."
            .to_string()
    }

    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "Search query"}
            },
            "required": ["query"]
        })
    }

    async fn invoke(&self, arguments: serde_json::Value) -> AgentResult<String> {
        let query = string_argument(Self::NAME, &arguments, "query")?;
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| AgentError::ConfigError("SERPER_API_KEY is not set".to_string()))?;

        let response = self
            .client
            .post(format!("{}/search", self.config.base_url.trim_end_matches('/')))
            .header("X-API-KEY", api_key)
            .json(&SearchRequest {
                q: &query,
                num: RESULT_COUNT,
            })
            .send()
            .await
            .map_err(|e| Self::failure(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::failure(format!("API error ({}): {}", status, body)));
        }

        let results: SearchResponse = response
            .json()
            .await
            .map_err(|e| Self::failure(format!("invalid response: {}", e)))?;

        Ok(format_results(&query, &results.organic))
    }
}
