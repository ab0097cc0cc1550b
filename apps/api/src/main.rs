use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use tripcrew_api::agents::TripPlanner;
use tripcrew_api::api::{self, AppState};
use tripcrew_api::config::AppConfig;
use tripcrew_api::infrastructure::openai::OpenAiClient;
use tripcrew_api::infrastructure::repositories::in_memory_session_repository::DEFAULT_MAX_SESSIONS;
use tripcrew_api::infrastructure::repositories::InMemorySessionRepository;
use tripcrew_api::infrastructure::tools::default_toolbox;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let http = reqwest::Client::builder()
        .user_agent(concat!("tripcrew/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let openai = Arc::new(OpenAiClient::new(http.clone(), config.openai.clone()));
    let toolbox = default_toolbox(http, &config);
    let planner = TripPlanner::new(openai.clone(), toolbox, config.agent_max_iterations)?;

    let state = AppState::new(
        Arc::new(planner),
        openai,
        Arc::new(InMemorySessionRepository::new(
            Duration::from_secs(config.session_idle_ttl_secs),
            DEFAULT_MAX_SESSIONS,
        )),
        config.max_queries_per_session,
    );
    let app = api::router(state);

    tracing::info!(
        model = %config.openai.model,
        query_limit = config.max_queries_per_session,
        "Server listening on {}",
        config.bind_addr
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
