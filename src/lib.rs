//! Trellis: sprint lifecycle and task-hierarchy engine.
//!
//! This crate provides the consistency core of a Kanban/Scrum project
//! management backend: the task store, parent status propagation, sprint
//! creation and closure, and the read-side backlog and board views.
//!
//! # Architecture
//!
//! Trellis follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external collaborators
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`task`]: Task records, the task store and parent status propagation
//! - [`sprint`]: Sprint registry and sprint lifecycle orchestration
//! - [`board`]: Backlog and sprint board partitioning
//! - [`identity`]: Current-user session contract
//! - [`notification`]: Fire-and-forget notification delivery
//! - [`config`]: Engine configuration
//! - [`failure`]: Failure classification and user-facing messages

pub mod board;
pub mod config;
pub mod failure;
pub mod identity;
pub mod notification;
pub mod sprint;
pub mod task;
