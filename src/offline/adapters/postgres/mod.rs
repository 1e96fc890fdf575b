//! `PostgreSQL` adapter for the offline delivery queue.

mod models;
mod repository;

pub use repository::PostgresOfflineQueue;
