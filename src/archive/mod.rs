//! Per-conversation message archive.
//!
//! Every pair of bare JIDs that exchanges messages gets exactly one
//! collection, identified by an order-independent [`domain::ConversationKey`].
//! Messages are appended to the collection, read back in time-ranged pages,
//! and replayed to peers through the renewal flag. The module follows
//! hexagonal architecture:
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
