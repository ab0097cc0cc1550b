// Infrastructure layer module
// Contains storage adapters and external service integrations
// Follows Hexagonal Architecture

pub mod openai;
pub mod repositories;
pub mod tools;
