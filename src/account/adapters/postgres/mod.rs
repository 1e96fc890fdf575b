//! `PostgreSQL` adapter for accounts, rosters and private documents.

mod models;
mod repository;

pub use repository::PostgresAccounts;
