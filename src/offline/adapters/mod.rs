//! Adapter implementations for offline queue ports.

pub mod memory;
pub mod postgres;
