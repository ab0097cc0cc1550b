use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::session::{RateLimitError, Session, SessionEvent};

/// Result of counting one planning run against a session
#[derive(Debug, Clone)]
pub struct QueryRegistration {
    /// Session state after the attempt, as stored
    pub session: Session,
    pub outcome: Result<Vec<SessionEvent>, RateLimitError>,
}

/// Repository trait for the Session aggregate
///
/// A session is only stored once it has a registered query, so visitors who
/// never submit leave nothing behind.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Find a session by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, String>;

    /// Loads the session (starting one with `query_limit` if unknown),
    /// registers a query and stores the result as one atomic step
    ///
    /// Concurrent calls for the same id are serialized, so the counter never
    /// passes the limit.
    async fn register_query(&self, id: Uuid, query_limit: u32)
        -> Result<QueryRegistration, String>;
}
