// Repository interfaces (ports)
// Implemented by adapters in the infrastructure layer

pub mod session_repository;

pub use session_repository::{QueryRegistration, SessionRepository};
