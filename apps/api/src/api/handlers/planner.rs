use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::session::{resolve_session, SessionResponse};
use crate::agents::imagery::{generate_destination_image, ImageOutcome};
use crate::agents::{AgentError, PlanResult, TaskOutput};
use crate::api::errors::ApiError;
use crate::api::middleware::SessionCookie;
use crate::api::state::AppState;
use crate::api::views::{render_page, FormValues, Notice, Page, ResultsView};
use crate::domain::session::{RateLimitError, Session, SessionEvent};
use crate::domain::trip::{RunInputs, ValidationError};

pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in the destination and dates.";

/// Urlencoded body posted by the planner form
///
/// Dates arrive as `YYYY-MM-DD`; blank or malformed ones count as missing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PlanForm {
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub interests: String,
    pub question: String,
}

impl PlanForm {
    fn values(&self) -> FormValues {
        FormValues {
            destination: self.destination.clone(),
            interests: self.interests.clone(),
            question: self.question.clone(),
            start_date: parse_date(&self.start_date),
            end_date: parse_date(&self.end_date),
        }
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Request body for JSON planning runs
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    #[serde(default)]
    pub destination: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub interests: String,
    #[serde(default)]
    pub question: String,
}

impl From<PlanRequest> for FormValues {
    fn from(req: PlanRequest) -> Self {
        Self {
            destination: req.destination,
            interests: req.interests,
            question: req.question,
            start_date: req.start_date,
            end_date: req.end_date,
        }
    }
}

/// Response from a JSON planning run
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub session: SessionResponse,
    pub destination: String,
    pub itinerary: Option<String>,
    pub expert_answer: Option<String>,
    pub image: ImageOutcome,
    pub outputs: Vec<TaskOutput>,
    pub log: String,
}

/// Why a run produced no results
#[derive(Debug)]
enum RunFailure {
    Invalid(ValidationError),
    Limited(RateLimitError),
    Pipeline(AgentError),
    Storage(String),
}

impl RunFailure {
    fn status(&self) -> StatusCode {
        match self {
            RunFailure::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RunFailure::Limited(_) => StatusCode::TOO_MANY_REQUESTS,
            RunFailure::Pipeline(_) => StatusCode::BAD_GATEWAY,
            RunFailure::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn notice(&self) -> Notice {
        match self {
            RunFailure::Invalid(ValidationError::MissingFields) => {
                Notice::warning(MISSING_FIELDS_MESSAGE)
            }
            RunFailure::Invalid(e) => Notice::warning(e.to_string()),
            RunFailure::Limited(e) => Notice::warning(e.to_string()),
            RunFailure::Pipeline(e) => Notice::error(format!("Planning failed: {}", e)),
            RunFailure::Storage(e) => Notice::error(e.clone()),
        }
    }
}

impl From<RunFailure> for ApiError {
    fn from(failure: RunFailure) -> Self {
        match failure {
            RunFailure::Invalid(ValidationError::MissingFields) => {
                ApiError::unprocessable(MISSING_FIELDS_MESSAGE)
            }
            RunFailure::Invalid(e) => e.into(),
            RunFailure::Limited(e) => e.into(),
            RunFailure::Pipeline(e) => e.into(),
            RunFailure::Storage(e) => ApiError::internal_server_error(e),
        }
    }
}

struct RunOutcome {
    inputs: RunInputs,
    plan: PlanResult,
    image: ImageOutcome,
}

/// Validate, count against the session, then run the crew and image request together
async fn run_plan(
    state: &AppState,
    session: &mut Session,
    values: &FormValues,
) -> Result<RunOutcome, RunFailure> {
    let inputs = RunInputs::new(
        &values.destination,
        values.start_date,
        values.end_date,
        &values.interests,
        &values.question,
    )
    .map_err(RunFailure::Invalid)?;

    let registration = state
        .sessions
        .register_query(session.id(), state.query_limit)
        .await
        .map_err(|e| RunFailure::Storage(format!("Failed to record query: {}", e)))?;
    *session = registration.session;
    let events = registration.outcome.map_err(|e| {
        tracing::info!(session_id = %session.id(), "Query rejected by rate limiter");
        RunFailure::Limited(e)
    })?;
    for event in &events {
        log_session_event(event);
    }

    let (plan, image) = tokio::join!(
        state.planner.plan(&inputs),
        generate_destination_image(state.images.as_ref(), inputs.destination()),
    );
    let plan = plan.map_err(|e| {
        tracing::error!(error = %e, "Trip planning failed");
        RunFailure::Pipeline(e)
    })?;

    Ok(RunOutcome {
        inputs,
        plan,
        image,
    })
}

fn log_session_event(event: &SessionEvent) {
    match event {
        SessionEvent::QueryRecorded {
            session_id,
            query_count,
        } => tracing::info!(%session_id, query_count, "Query recorded"),
        SessionEvent::LimitReached { session_id, limit } => {
            tracing::info!(%session_id, limit, "Session reached its query limit")
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Render the planner form
///
/// GET /
pub async fn index(
    State(state): State<AppState>,
    SessionCookie(cookie): SessionCookie,
) -> Result<Response, ApiError> {
    let resolved = resolve_session(&state, cookie).await?;
    let page = Page {
        today: today(),
        form: FormValues::default(),
        session: &resolved.session,
        notice: None,
        results: None,
    };
    let html = Html(render_page(&page));
    Ok(resolved.finish(html))
}

/// Handle a form submission and render the results page
///
/// POST /plan
pub async fn submit_plan(
    State(state): State<AppState>,
    SessionCookie(cookie): SessionCookie,
    Form(form): Form<PlanForm>,
) -> Result<Response, ApiError> {
    let mut resolved = resolve_session(&state, cookie).await?;
    let values = form.values();

    let (status, html) = match run_plan(&state, &mut resolved.session, &values).await {
        Ok(outcome) => {
            let page = Page {
                today: today(),
                form: values,
                session: &resolved.session,
                notice: None,
                results: Some(ResultsView {
                    destination: outcome.inputs.destination().as_str(),
                    plan: &outcome.plan,
                    image: &outcome.image,
                }),
            };
            (StatusCode::OK, render_page(&page))
        }
        Err(failure) => {
            let page = Page {
                today: today(),
                form: values,
                session: &resolved.session,
                notice: Some(failure.notice()),
                results: None,
            };
            (failure.status(), render_page(&page))
        }
    };

    Ok(resolved.finish((status, Html(html))))
}

/// Run the planner and return JSON
///
/// POST /api/plans
pub async fn create_plan(
    State(state): State<AppState>,
    SessionCookie(cookie): SessionCookie,
    Json(req): Json<PlanRequest>,
) -> Result<Response, ApiError> {
    let mut resolved = resolve_session(&state, cookie).await?;
    let values = FormValues::from(req);

    let response = match run_plan(&state, &mut resolved.session, &values).await {
        Ok(outcome) => {
            let body = PlanResponse {
                session: SessionResponse::from(&resolved.session),
                destination: outcome.inputs.destination().to_string(),
                itinerary: outcome.plan.itinerary,
                expert_answer: outcome.plan.expert_answer,
                image: outcome.image,
                outputs: outcome.plan.outputs,
                log: outcome.plan.log,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(failure) => ApiError::from(failure).into_response(),
    };

    Ok(resolved.finish(response))
}
