//! In-memory account adapter.

mod accounts;

pub use accounts::InMemoryAccounts;
