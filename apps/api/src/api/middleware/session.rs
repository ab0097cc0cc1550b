use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts, HeaderValue},
};
use uuid::Uuid;

use crate::api::errors::ApiError;

pub const SESSION_COOKIE: &str = "tripcrew_session";

/// Session identity carried in the `tripcrew_session` cookie
///
/// Never rejects: a missing or malformed cookie yields `SessionCookie(None)`
/// and the handler starts a fresh session.
///
/// Usage:
/// ```rust,ignore
/// async fn handler(SessionCookie(id): SessionCookie) -> String {
///     format!("{:?}", id)
/// }
/// ```
pub struct SessionCookie(pub Option<Uuid>);

#[async_trait]
impl<S> FromRequestParts<S> for SessionCookie
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(session_id_from_cookie_header);

        Ok(SessionCookie(id))
    }
}

/// Finds and parses our cookie in a `Cookie:` header value
pub fn session_id_from_cookie_header(header: &str) -> Option<Uuid> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value establishing a session
pub fn session_cookie_header(id: Uuid) -> HeaderValue {
    // A hyphenated UUID is always a valid header value
    HeaderValue::from_str(&format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, id
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("tripcrew_session=; Path=/"))
}
