//! Port contracts for the offline delivery queue.

pub mod repository;

pub use repository::OfflineRepository;
