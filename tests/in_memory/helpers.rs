//! Shared fixtures for in-memory integration tests.

use crate::test_helpers::SteppingClock;
use ::parley::account::{adapters::memory::InMemoryAccounts, services::AccountService};
use ::parley::archive::{
    adapters::memory::InMemoryArchive,
    services::{ArchiveService, RenewalTracker},
};
use ::parley::offline::{adapters::memory::InMemoryOfflineQueue, services::OfflineQueue};
use ::parley::storage::MemoryStore;
use rstest::fixture;
use std::sync::Arc;

/// Every service wired to one shared in-memory store.
pub struct InMemoryParley {
    /// Archive append and lookup.
    pub archive: ArchiveService<InMemoryArchive, SteppingClock>,
    /// Renewal streaming and clearing.
    pub renewal: RenewalTracker<InMemoryArchive>,
    /// Offline delivery queue.
    pub offline: OfflineQueue<InMemoryOfflineQueue, SteppingClock>,
    /// Accounts, rosters and documents.
    pub accounts: AccountService<InMemoryAccounts, InMemoryAccounts>,
}

/// Provides services over a fresh store.
#[fixture]
pub fn parley() -> InMemoryParley {
    let store = MemoryStore::new();
    let clock = Arc::new(SteppingClock::new());
    let archive = Arc::new(InMemoryArchive::with_store(store.clone()));
    let accounts = Arc::new(InMemoryAccounts::with_store(store.clone()));
    InMemoryParley {
        archive: ArchiveService::new(Arc::clone(&archive), Arc::clone(&clock)),
        renewal: RenewalTracker::new(archive),
        offline: OfflineQueue::new(Arc::new(InMemoryOfflineQueue::with_store(store)), clock),
        accounts: AccountService::new(Arc::clone(&accounts), accounts),
    }
}
