//! Shared world state for conversation archive BDD scenarios.

use std::sync::Arc;

use crate::test_helpers::{SteppingClock, chat};
use parley::archive::{
    adapters::memory::InMemoryArchive,
    services::{ArchiveService, RenewalTracker},
};
use rstest::fixture;

/// Scenario world for archive behaviour tests.
pub struct ArchiveWorld {
    /// The archive service under test.
    pub archive: ArchiveService<InMemoryArchive, SteppingClock>,
    /// Renewal tracker over the same archive.
    pub renewal: RenewalTracker<InMemoryArchive>,
}

impl ArchiveWorld {
    /// Creates a world over an empty archive.
    #[must_use]
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryArchive::new());
        Self {
            archive: ArchiveService::new(Arc::clone(&repository), Arc::new(SteppingClock::new())),
            renewal: RenewalTracker::new(repository),
        }
    }

    /// Archives a chat message from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive rejects the message.
    pub fn send(&self, from: &str, to: &str, body: &str) -> Result<(), eyre::Report> {
        run_async(self.archive.append_message(&chat(from, to, body)))
            .map_err(|err| eyre::eyre!("append failed: {err}"))?;
        Ok(())
    }
}

impl Default for ArchiveWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ArchiveWorld {
    ArchiveWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
