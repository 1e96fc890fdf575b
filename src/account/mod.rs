//! Accounts, rosters and private per-account documents.
//!
//! An account is identified by its bare JID and owns a roster of contacts,
//! a vCard and any number of private XML fragments. Roster saves merge the
//! submitted contacts into the stored ones rather than rewriting them; see
//! [`domain::RosterDiff`].

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
