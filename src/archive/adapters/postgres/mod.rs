//! `PostgreSQL` adapter for the conversation archive.

mod models;
mod repository;

pub use repository::PostgresArchive;
