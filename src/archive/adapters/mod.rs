//! Adapter implementations for archive ports.

pub mod memory;
pub mod postgres;
