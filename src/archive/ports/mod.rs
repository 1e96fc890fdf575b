//! Port contracts for the conversation archive.

pub mod repository;

pub use repository::{ArchiveRepository, RenewalRepository};
