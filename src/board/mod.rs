//! Read-side backlog and sprint board views.
//!
//! Views are derived from a [`domain::ProjectSnapshot`] on every query and are
//! never stored. They tolerate the intermediate states a partially failed
//! sprint closure can leave behind: a task still pointing at a completed or
//! unknown sprint is shown as if it had already returned to the backlog.
//!
//! - Pure view functions in [`domain`]
//! - The snapshot cache in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
