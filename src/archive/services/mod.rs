//! Service layer for the conversation archive.

mod archive;
mod renewal;

pub use archive::{ArchiveService, ArchiveServiceError, ArchiveServiceResult};
pub use renewal::{DEFAULT_RENEWAL_BATCH_SIZE, RenewalTracker};
