// Domain layer module exports
// Crew definitions, trip inputs and session rate limiting.
// Domain is independent of infrastructure concerns

pub mod crew;
pub mod repositories;
pub mod session;
pub mod trip;
