pub mod health;
pub mod planner;
pub mod session;
