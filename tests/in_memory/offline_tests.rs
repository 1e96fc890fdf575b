//! Offline queue tests over the in-memory adapter.

use super::helpers::{InMemoryParley, parley};
use crate::test_helpers::{chat, jid};
use ::parley::account::domain::User;
use ::parley::offline::domain::EnqueueOutcome;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn queues_are_bounded_per_user(parley: InMemoryParley) {
    for owner in ["alice@example.com", "bob@example.com"] {
        parley
            .accounts
            .save_user(&User::new(jid(owner)))
            .await
            .expect("save should succeed");
    }
    let stanza = chat("carol@example.com", "alice@example.com", "hello");

    for _ in 0..1001 {
        parley
            .offline
            .enqueue("alice@example.com", &stanza)
            .await
            .expect("enqueue should succeed");
    }
    let bob_outcome = parley
        .offline
        .enqueue("bob@example.com", &stanza)
        .await
        .expect("enqueue should succeed");

    assert_eq!(
        parley
            .offline
            .pending_count("alice@example.com")
            .await
            .expect("count should succeed"),
        1000
    );
    assert!(bob_outcome.is_queued());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn enqueue_never_creates_accounts(parley: InMemoryParley) {
    let outcome = parley
        .offline
        .enqueue("ghost@example.com", &chat("a@example.com", "ghost@example.com", "?"))
        .await
        .expect("enqueue should succeed");

    assert_eq!(outcome, EnqueueOutcome::UnknownUser);
    assert!(
        !parley
            .accounts
            .user_exists("ghost@example.com")
            .await
            .expect("check should succeed")
    );
}
