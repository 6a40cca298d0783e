//! In-memory adapters for sprint persistence.

mod sprint;

pub use sprint::InMemorySprintRepository;
