use std::sync::Arc;

use crate::agents::{ImageGenerator, TripPlanner};
use crate::domain::repositories::SessionRepository;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<TripPlanner>,
    pub images: Arc<dyn ImageGenerator>,
    pub sessions: Arc<dyn SessionRepository>,
    /// Planning runs allowed per session
    pub query_limit: u32,
}

impl AppState {
    pub fn new(
        planner: Arc<TripPlanner>,
        images: Arc<dyn ImageGenerator>,
        sessions: Arc<dyn SessionRepository>,
        query_limit: u32,
    ) -> Self {
        Self {
            planner,
            images,
            sessions,
            query_limit,
        }
    }
}
