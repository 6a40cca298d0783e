//! Port contracts for sprint persistence.

pub mod repository;

pub use repository::{SprintRepository, SprintRepositoryError, SprintRepositoryResult};
