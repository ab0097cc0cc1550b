//! Fakes shared by the integration tests
//!
//! The model answers by agent role (read from the system prompt) and
//! records every request so tests can check scheduling and prompts.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Barrier;

use tripcrew_api::agents::llm::ImageRequest;
use tripcrew_api::agents::messages::{ChatRequest, ChatResponse, MessageRole};
use tripcrew_api::agents::{
    AgentError, AgentResult, ImageGenerator, LanguageModel, Tool, ToolBox, TripPlanner,
};
use tripcrew_api::api::AppState;
use tripcrew_api::domain::crew::{AgentRole, ToolKind};
use tripcrew_api::infrastructure::repositories::InMemorySessionRepository;

pub const RESEARCH_REPLY: &str = "Louvre, Musée d'Orsay, Le Potager du Marais";
pub const ITINERARY_REPLY: &str = "**Day 1: 2024-06-01**\n* 09:00: Louvre";
pub const EXPERT_REPLY: &str = "Le Potager du Marais serves vegetarian French classics.";

/// One request seen by the model
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub role: Option<AgentRole>,
    pub user_prompt: String,
    pub tools: Vec<String>,
}

/// Language model that answers each role with a fixed final answer
pub struct CrewModel {
    replies: HashMap<AgentRole, String>,
    failing: Option<AgentRole>,
    /// Roles that must all be inside `complete` at once before any replies
    rendezvous: Option<(Vec<AgentRole>, Arc<Barrier>)>,
    delay: Duration,
    calls: Mutex<Vec<RecordedCall>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl CrewModel {
    pub fn new() -> Self {
        let replies = HashMap::from([
            (AgentRole::TravelResearcher, RESEARCH_REPLY.to_string()),
            (AgentRole::ItineraryPlanner, ITINERARY_REPLY.to_string()),
            (AgentRole::LocalExpert, EXPERT_REPLY.to_string()),
        ]);
        Self {
            replies,
            failing: None,
            rendezvous: None,
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        }
    }

    pub fn failing_for(mut self, role: AgentRole) -> Self {
        self.failing = Some(role);
        self
    }

    pub fn with_rendezvous(mut self, roles: Vec<AgentRole>) -> Self {
        let barrier = Arc::new(Barrier::new(roles.len()));
        self.rendezvous = Some((roles, barrier));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, role: AgentRole) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.role == Some(role))
            .collect()
    }
}

fn role_of(request: &ChatRequest) -> Option<AgentRole> {
    let system = request
        .messages
        .iter()
        .find(|message| message.role == MessageRole::System)?;
    AgentRole::ALL
        .into_iter()
        .find(|role| system.content.starts_with(&format!("You are {}.", role.name())))
}

#[async_trait]
impl LanguageModel for CrewModel {
    fn name(&self) -> &str {
        "crew-fake"
    }

    async fn complete(&self, request: ChatRequest) -> AgentResult<ChatResponse> {
        let role = role_of(&request);
        let user_prompt = request
            .messages
            .iter()
            .find(|message| message.role == MessageRole::User)
            .map(|message| message.content.clone())
            .unwrap_or_default();
        self.calls.lock().unwrap().push(RecordedCall {
            role,
            user_prompt,
            tools: request.tools.iter().map(|tool| tool.name.clone()).collect(),
        });

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);

        if let (Some((roles, barrier)), Some(role)) = (&self.rendezvous, role) {
            if roles.contains(&role) {
                barrier.wait().await;
            }
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.active.fetch_sub(1, Ordering::SeqCst);

        match role {
            Some(role) if self.failing == Some(role) => {
                Err(AgentError::LlmError(format!("{} is unavailable", role)))
            }
            Some(role) => Ok(ChatResponse::text(
                self.replies.get(&role).cloned().unwrap_or_default(),
            )),
            None => Ok(ChatResponse::text("ok")),
        }
    }
}

/// Image generator returning a fixed URL or a fixed error
pub struct FakeImages {
    fail: bool,
    requests: Mutex<Vec<ImageRequest>>,
}

impl FakeImages {
    pub fn ok() -> Self {
        Self {
            fail: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ImageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerator for FakeImages {
    async fn generate(&self, request: ImageRequest) -> AgentResult<String> {
        self.requests.lock().unwrap().push(request);
        if self.fail {
            Err(AgentError::ImageError("content policy".to_string()))
        } else {
            Ok("https://images.example/banner.png".to_string())
        }
    }
}

/// Tool that answers with its own name
pub struct NoopTool {
    name: &'static str,
}

#[async_trait]
impl Tool for NoopTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> String {
        format!("{} stand-in", self.name)
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    async fn invoke(&self, _arguments: serde_json::Value) -> AgentResult<String> {
        Ok(format!("{} result", self.name))
    }
}

pub fn noop_toolbox() -> ToolBox {
    ToolBox::new()
        .with_tool(
            ToolKind::WebSearch,
            Arc::new(NoopTool { name: "web_search" }),
        )
        .with_tool(
            ToolKind::ScrapeWebsite,
            Arc::new(NoopTool {
                name: "scrape_website",
            }),
        )
}

pub struct TestApp {
    pub state: AppState,
    pub model: Arc<CrewModel>,
    pub images: Arc<FakeImages>,
    pub sessions: Arc<InMemorySessionRepository>,
}

pub fn build_app(model: CrewModel, images: FakeImages, query_limit: u32) -> TestApp {
    let model = Arc::new(model);
    let images = Arc::new(images);
    let sessions = Arc::new(InMemorySessionRepository::default());
    let planner = TripPlanner::new(model.clone(), noop_toolbox(), 3).unwrap();
    let state = AppState::new(
        Arc::new(planner),
        images.clone(),
        sessions.clone(),
        query_limit,
    );

    TestApp {
        state,
        model,
        images,
        sessions,
    }
}
