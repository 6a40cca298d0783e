//! Adapter implementations for sprint persistence ports.

pub mod memory;
pub mod postgres;
