//! `PostgreSQL` adapters for the sprint registry.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresSprintRepository, SprintPgPool};
