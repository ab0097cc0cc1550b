use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::session::session_cookie_header;
use crate::api::middleware::SessionCookie;
use crate::api::state::AppState;
use crate::domain::session::Session;

/// Session state as exposed over JSON
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub query_count: u32,
    pub query_limit: u32,
    pub remaining: u32,
    pub submit_disabled: bool,
    pub created_at: DateTime<Utc>,
    pub last_query_at: Option<DateTime<Utc>>,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id(),
            query_count: session.query_count(),
            query_limit: session.query_limit(),
            remaining: session.remaining(),
            submit_disabled: session.submit_disabled(),
            created_at: session.created_at(),
            last_query_at: session.last_query_at(),
        }
    }
}

/// A session resolved from the request cookie
pub struct ResolvedSession {
    pub session: Session,
    /// Set when the browser has no cookie for it yet
    pub issue_cookie: bool,
}

impl ResolvedSession {
    /// Attaches `Set-Cookie` to the response when the session is new
    pub fn finish(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if self.issue_cookie {
            response
                .headers_mut()
                .insert(SET_COOKIE, session_cookie_header(self.session.id()));
        }
        response
    }
}

/// Loads the caller's session, starting a fresh one when the cookie is missing or unknown
pub async fn resolve_session(
    state: &AppState,
    cookie: Option<Uuid>,
) -> Result<ResolvedSession, ApiError> {
    if let Some(id) = cookie {
        let existing = state.sessions.find_by_id(id).await.map_err(|e| {
            ApiError::internal_server_error(format!("Failed to load session: {}", e))
        })?;
        if let Some(session) = existing {
            return Ok(ResolvedSession {
                session,
                issue_cookie: false,
            });
        }
    }

    // Not stored until its first query is registered
    let session = Session::new(cookie.unwrap_or_else(Uuid::new_v4), state.query_limit);

    Ok(ResolvedSession {
        session,
        issue_cookie: cookie.is_none(),
    })
}

/// Get the caller's session
///
/// GET /api/session
pub async fn get_session(
    State(state): State<AppState>,
    SessionCookie(cookie): SessionCookie,
) -> Result<Response, ApiError> {
    let resolved = resolve_session(&state, cookie).await?;
    let body = Json(SessionResponse::from(&resolved.session));
    Ok(resolved.finish(body))
}
