// Application configuration
// Read once from the environment (after .env is loaded) and shared by
// reference; nothing else reads environment variables.

use std::net::SocketAddr;

use thiserror::Error;

use crate::domain::session::DEFAULT_QUERY_LIMIT;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-2";
pub const DEFAULT_SERPER_BASE_URL: &str = "https://google.serper.dev";
pub const DEFAULT_MAX_ITERATIONS: usize = 15;
pub const DEFAULT_SCRAPE_MAX_CHARS: usize = 8000;
pub const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Credentials and endpoint for the OpenAI-compatible API
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Absent keys are not rejected here; calls fail at first use
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub image_model: String,
}

#[derive(Debug, Clone)]
pub struct SerperConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub openai: OpenAiConfig,
    pub serper: SerperConfig,
    pub max_queries_per_session: u32,
    pub agent_max_iterations: usize,
    pub scrape_max_chars: usize,
    /// Seconds a session may sit unused before it is forgotten
    pub session_idle_ttl_secs: u64,
}

impl AppConfig {
    /// Builds the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let openai_key = get("OPENAI_API_KEY");
        if openai_key.is_none() {
            tracing::warn!("OPENAI_API_KEY not set, model and image calls will fail");
        }
        let serper_key = get("SERPER_API_KEY");
        if serper_key.is_none() {
            tracing::warn!("SERPER_API_KEY not set, web search will fail");
        }

        Ok(Self {
            bind_addr: parse_or("BIND_ADDR", get("BIND_ADDR"), DEFAULT_BIND_ADDR)?,
            openai: OpenAiConfig {
                api_key: openai_key,
                base_url: get("OPENAI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
                model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
                image_model: get("OPENAI_IMAGE_MODEL")
                    .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            },
            serper: SerperConfig {
                api_key: serper_key,
                base_url: get("SERPER_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_SERPER_BASE_URL.to_string()),
            },
            max_queries_per_session: parse_or(
                "MAX_QUERIES_PER_SESSION",
                get("MAX_QUERIES_PER_SESSION"),
                &DEFAULT_QUERY_LIMIT.to_string(),
            )?,
            agent_max_iterations: parse_or(
                "AGENT_MAX_ITERATIONS",
                get("AGENT_MAX_ITERATIONS"),
                &DEFAULT_MAX_ITERATIONS.to_string(),
            )?,
            scrape_max_chars: parse_or(
                "SCRAPE_MAX_CHARS",
                get("SCRAPE_MAX_CHARS"),
                &DEFAULT_SCRAPE_MAX_CHARS.to_string(),
            )?,
            session_idle_ttl_secs: parse_or(
                "SESSION_IDLE_TTL_SECS",
                get("SESSION_IDLE_TTL_SECS"),
                &DEFAULT_SESSION_IDLE_TTL_SECS.to_string(),
            )?,
        })
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = value.unwrap_or_else(|| default.to_string());
    raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        value: raw.clone(),
        reason: e.to_string(),
    })
}
