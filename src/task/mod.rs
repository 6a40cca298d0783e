//! Task records, the task store and parent status propagation.
//!
//! Tasks form a shallow hierarchy: user stories and standalone tasks at the
//! top, sub-tasks beneath a parent. Whenever a sub-task changes, its parent's
//! status is re-derived from its children. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
