//! In-memory archive adapter.

mod archive;

pub use archive::InMemoryArchive;
