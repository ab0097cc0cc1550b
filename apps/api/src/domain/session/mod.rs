// Session domain module
// Contains the per-session rate limiter aggregate and its events

#![allow(clippy::module_inception)]

pub mod events;
pub mod session;

pub use events::SessionEvent;
pub use session::{RateLimitError, Session, DEFAULT_QUERY_LIMIT};
