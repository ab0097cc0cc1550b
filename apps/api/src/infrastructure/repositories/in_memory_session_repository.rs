use std::time::Duration;

use async_trait::async_trait;
use moka::ops::compute::Op;
use moka::sync::Cache;
use uuid::Uuid;

use crate::domain::repositories::{QueryRegistration, SessionRepository};
use crate::domain::session::Session;

/// Idle time after which a session is forgotten
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);
/// Upper bound on sessions held at once
pub const DEFAULT_MAX_SESSIONS: u64 = 100_000;

/// Process-local implementation of SessionRepository
///
/// Backed by a moka cache: sessions expire after `idle_ttl` without use and
/// the least recently used ones are evicted past `max_sessions`.
#[derive(Clone)]
pub struct InMemorySessionRepository {
    sessions: Cache<Uuid, Session>,
}

impl InMemorySessionRepository {
    pub fn new(idle_ttl: Duration, max_sessions: u64) -> Self {
        Self {
            sessions: Cache::builder()
                .time_to_idle(idle_ttl)
                .max_capacity(max_sessions)
                .build(),
        }
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL, DEFAULT_MAX_SESSIONS)
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, String> {
        Ok(self.sessions.get(&id))
    }

    async fn register_query(
        &self,
        id: Uuid,
        query_limit: u32,
    ) -> Result<QueryRegistration, String> {
        let mut registration = None;

        // The compute closure holds the per-key lock for the whole update
        self.sessions.entry(id).and_compute_with(|entry| {
            let mut session = entry
                .map(|entry| entry.into_value())
                .unwrap_or_else(|| Session::new(id, query_limit));
            let outcome = session.register_query();
            let op = match outcome {
                Ok(_) => Op::Put(session.clone()),
                Err(_) => Op::Nop,
            };
            registration = Some(QueryRegistration { session, outcome });
            op
        });

        registration.ok_or_else(|| format!("Session {} was not updated", id))
    }
}
