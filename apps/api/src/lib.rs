//! Trip Crew API Library
//!
//! Plans travel itineraries with a small crew of LLM-backed agents and
//! serves the planner over HTTP.

pub mod agents;
pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
