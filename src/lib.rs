//! Parley: persistence engine for an XMPP messaging server.
//!
//! This crate stores accounts and rosters, private extension documents and
//! vCards, an append-only per-conversation message archive and a bounded
//! offline delivery queue. It persists and retrieves only; delivery,
//! presence and sessions belong to the server using it.
//!
//! # Architecture
//!
//! Parley follows hexagonal architecture principles:
//!
//! - **Domain**: Pure types with no infrastructure dependencies
//! - **Ports**: Async repository traits
//! - **Adapters**: `memory` for tests and embedding, `postgres` for
//!   production
//! - **Services**: Clock-driven orchestration taking raw JIDs and stanzas
//!
//! # Modules
//!
//! - [`archive`]: Conversation collections, paginated retrieval and renewal
//! - [`offline`]: Bounded per-user queue of undelivered stanzas
//! - [`account`]: Users, roster diff-merge, vCards and private fragments
//! - [`storage`]: Pooled connection gateway, schema and in-memory tables
//! - [`config`]: Storage configuration

pub mod account;
pub mod address;
pub mod archive;
pub mod config;
pub mod document;
pub mod offline;
pub mod storage;
pub mod time;

#[cfg(test)]
mod test_support;
