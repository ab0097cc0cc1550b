use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::events::SessionEvent;

/// Default number of planning runs one session may request
pub const DEFAULT_QUERY_LIMIT: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateLimitError {
    #[error("You have reached the limit of {limit} queries. Please try again later.")]
    LimitReached { limit: u32 },
}

/// Rate limiter state for one browser session
///
/// # States
/// ```text
/// Enabled (count < limit) --register_query--> Enabled (count + 1)
///                          \--count reaches limit--> Disabled (terminal)
/// ```
///
/// # Invariants
/// - `query_count` never exceeds `query_limit`
/// - Once `submit_disabled` is set it is never cleared; a fresh session
///   is the only way back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: Uuid,
    query_count: u32,
    query_limit: u32,
    submit_disabled: bool,
    created_at: DateTime<Utc>,
    last_query_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Starts a new, enabled session
    ///
    /// # Example
    /// ```
    /// use tripcrew_api::domain::session::Session;
    /// use uuid::Uuid;
    ///
    /// let mut session = Session::new(Uuid::new_v4(), 2);
    /// assert!(session.register_query().is_ok());
    /// assert!(session.register_query().is_ok());
    /// assert!(session.register_query().is_err());
    /// assert_eq!(session.query_count(), 2);
    /// ```
    pub fn new(id: Uuid, query_limit: u32) -> Self {
        Self {
            id,
            query_count: 0,
            query_limit,
            submit_disabled: query_limit == 0,
            created_at: Utc::now(),
            last_query_at: None,
        }
    }

    /// Counts a planning request against the session's allowance
    ///
    /// # Returns
    /// * `Ok(Vec<SessionEvent>)` - The run may proceed
    /// * `Err(RateLimitError)` - The allowance is used up; no run may happen
    pub fn register_query(&mut self) -> Result<Vec<SessionEvent>, RateLimitError> {
        if self.submit_disabled || self.query_count >= self.query_limit {
            self.submit_disabled = true;
            return Err(RateLimitError::LimitReached {
                limit: self.query_limit,
            });
        }

        self.query_count += 1;
        self.last_query_at = Some(Utc::now());

        let mut events = vec![SessionEvent::QueryRecorded {
            session_id: self.id,
            query_count: self.query_count,
        }];

        if self.query_count >= self.query_limit {
            self.submit_disabled = true;
            events.push(SessionEvent::LimitReached {
                session_id: self.id,
                limit: self.query_limit,
            });
        }

        Ok(events)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn query_count(&self) -> u32 {
        self.query_count
    }

    pub fn query_limit(&self) -> u32 {
        self.query_limit
    }

    pub fn submit_disabled(&self) -> bool {
        self.submit_disabled
    }

    /// Queries left before the session is disabled
    pub fn remaining(&self) -> u32 {
        self.query_limit.saturating_sub(self.query_count)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_query_at(&self) -> Option<DateTime<Utc>> {
        self.last_query_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_enabled() {
        let session = Session::new(Uuid::new_v4(), DEFAULT_QUERY_LIMIT);

        assert_eq!(session.query_count(), 0);
        assert!(!session.submit_disabled());
        assert_eq!(session.remaining(), 2);
        assert!(session.last_query_at().is_none());
    }

    #[test]
    fn first_query_is_recorded() {
        let mut session = Session::new(Uuid::new_v4(), DEFAULT_QUERY_LIMIT);

        let events = session.register_query().unwrap();

        assert_eq!(session.query_count(), 1);
        assert!(!session.submit_disabled());
        assert_eq!(
            events,
            vec![SessionEvent::QueryRecorded {
                session_id: session.id(),
                query_count: 1
            }]
        );
    }

    #[test]
    fn second_query_disables_submission() {
        let mut session = Session::new(Uuid::new_v4(), DEFAULT_QUERY_LIMIT);
        session.register_query().unwrap();

        let events = session.register_query().unwrap();

        assert!(session.submit_disabled());
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], SessionEvent::LimitReached { limit: 2, .. }));
    }

    #[test]
    fn third_query_is_rejected_and_count_is_capped() {
        let mut session = Session::new(Uuid::new_v4(), DEFAULT_QUERY_LIMIT);
        session.register_query().unwrap();
        session.register_query().unwrap();

        for _ in 0..5 {
            assert_eq!(
                session.register_query().unwrap_err(),
                RateLimitError::LimitReached { limit: 2 }
            );
        }

        assert_eq!(session.query_count(), 2);
        assert!(session.submit_disabled());
        assert_eq!(session.remaining(), 0);
    }

    #[test]
    fn zero_limit_starts_disabled() {
        let mut session = Session::new(Uuid::new_v4(), 0);

        assert!(session.submit_disabled());
        assert!(session.register_query().is_err());
        assert_eq!(session.query_count(), 0);
    }

    #[test]
    fn rate_limit_message_names_the_limit() {
        let err = RateLimitError::LimitReached { limit: 2 };

        assert_eq!(
            err.to_string(),
            "You have reached the limit of 2 queries. Please try again later."
        );
    }
}
