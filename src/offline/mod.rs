//! Bounded offline delivery queue.
//!
//! Stanzas addressed to an account that is not connected wait here, oldest
//! first, until the server drains and deletes them. Each account holds at
//! most [`domain::MAX_PENDING_STANZAS_PER_USER`] stanzas; beyond that new
//! stanzas are dropped.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
