//! Sprint registry and sprint lifecycle orchestration.
//!
//! A sprint is created from a selection of backlog items and later closed,
//! which partitions its items into completed work and work returned to the
//! backlog. At most one sprint per project is active at any time. The module
//! follows hexagonal architecture:
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
