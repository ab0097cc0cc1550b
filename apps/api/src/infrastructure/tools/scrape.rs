use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::json;

use crate::agents::errors::{AgentError, AgentResult};
use crate::agents::tools::{string_argument, Tool};

/// Page bytes read before the rest of the body is dropped
pub const DEFAULT_MAX_PAGE_BYTES: usize = 2 * 1024 * 1024;

/// Fetches a page and returns its content as Markdown text
#[derive(Debug, Clone)]
pub struct ScrapeWebsiteTool {
    client: Client,
    max_chars: usize,
    max_bytes: usize,
}

impl ScrapeWebsiteTool {
    pub const NAME: &'static str = "scrape_website";

    pub fn new(client: Client, max_chars: usize) -> Self {
        Self {
            client,
            max_chars,
            max_bytes: DEFAULT_MAX_PAGE_BYTES,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    fn failure(message: impl Into<String>) -> AgentError {
        AgentError::ToolFailed {
            tool: Self::NAME.to_string(),
            message: message.into(),
        }
    }
}

/// Only absolute http(s) URLs are fetched
pub fn parse_target(raw: &str) -> AgentResult<Url> {
    let url = Url::parse(raw)
        .map_err(|e| ScrapeWebsiteTool::failure(format!("invalid URL '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ScrapeWebsiteTool::failure(format!(
            "unsupported URL scheme '{}'",
            other
        ))),
    }
}

/// Converts HTML to text and caps it at `max_chars` characters
pub fn extract_text(html: &str, max_chars: usize) -> AgentResult<String> {
    let markdown = htmd::convert(html)
        .map_err(|e| ScrapeWebsiteTool::failure(format!("could not parse page: {}", e)))?;
    let text = markdown.trim();

    if text.chars().count() <= max_chars {
        return Ok(text.to_string());
    }

    let truncated: String = text.chars().take(max_chars).collect();
    Ok(format!("{}\n[content truncated]", truncated))
}

#[async_trait]
impl Tool for ScrapeWebsiteTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> String {
        "Read a website's content. Input is the full URL of the page to read.".to_string()
    }

    fn parameters(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "website_url": {"type": "string", "description": "Full URL of the page"}
            },
            "required": ["website_url"]
        })
    }

    async fn invoke(&self, arguments: serde_json::Value) -> AgentResult<String> {
        let url = parse_target(&string_argument(Self::NAME, &arguments, "website_url")?)?;

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Self::failure(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::failure(format!("{} returned {}", url, status)));
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Self::failure(format!("failed to read {}: {}", url, e)))?
        {
            let room = self.max_bytes - body.len();
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                tracing::debug!(%url, max_bytes = self.max_bytes, "Page body capped");
                break;
            }
            body.extend_from_slice(&chunk);
        }

        extract_text(&String::from_utf8_lossy(&body), self.max_chars)
    }
}
