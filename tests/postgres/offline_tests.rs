//! Offline queue adapter tests against `PostgreSQL`.

use super::helpers::{BoxError, PostgresParley};
use crate::test_helpers::{SteppingClock, chat, jid};
use parley::account::domain::User;
use parley::offline::adapters::postgres::PostgresOfflineQueue;
use parley::offline::domain::{EnqueueOutcome, QueuePolicy};
use parley::offline::services::OfflineQueue;
use rstest::rstest;
use std::num::NonZeroUsize;
use std::sync::Arc;

async fn register(parley: &PostgresParley, owner: &str) {
    parley
        .accounts
        .save_user(&User::new(jid(owner)))
        .await
        .expect("save should succeed");
}

#[rstest]
#[ignore = "requires PARLEY_TEST_DATABASE_URL"]
#[tokio::test(flavor = "multi_thread")]
async fn full_queue_drops_new_stanzas() -> Result<(), BoxError> {
    let parley = PostgresParley::provision()?;
    register(&parley, "alice@example.com").await;
    let drain_limit = NonZeroUsize::new(10).expect("non-zero");
    let queue = OfflineQueue::new(
        Arc::new(PostgresOfflineQueue::new(parley.database.gateway())),
        Arc::new(SteppingClock::new()),
    )
    .with_policy(QueuePolicy::new(3, drain_limit));

    let mut outcomes = Vec::new();
    for body in ["1", "2", "3", "4"] {
        let stanza = chat("bob@example.com", "alice@example.com", body);
        outcomes.push(
            queue
                .enqueue("alice@example.com", &stanza)
                .await
                .expect("enqueue should succeed"),
        );
    }

    assert_eq!(outcomes.last(), Some(&EnqueueOutcome::Dropped));
    assert_eq!(
        outcomes.iter().filter(|outcome| outcome.is_queued()).count(),
        3
    );
    let drained = queue
        .drain("alice@example.com")
        .await
        .expect("drain should succeed");
    assert_eq!(drained.len(), 3);
    Ok(())
}

#[rstest]
#[ignore = "requires PARLEY_TEST_DATABASE_URL"]
#[tokio::test(flavor = "multi_thread")]
async fn drain_is_oldest_first_and_delete_is_exact() -> Result<(), BoxError> {
    let parley = PostgresParley::provision()?;
    register(&parley, "alice@example.com").await;
    for body in ["first", "second", "third"] {
        parley
            .offline
            .enqueue(
                "alice@example.com",
                &chat("bob@example.com", "alice@example.com", body),
            )
            .await
            .expect("enqueue should succeed");
    }

    let oldest = parley
        .offline
        .drain_up_to("alice@example.com", 2)
        .await
        .expect("drain should succeed");
    assert_eq!(oldest.len(), 2);
    assert!(
        oldest
            .first()
            .is_some_and(|stanza| stanza.xml().contains("first"))
    );
    let ids: Vec<_> = oldest.iter().map(|stanza| stanza.id()).collect();
    let removed = parley
        .offline
        .delete(&ids)
        .await
        .expect("delete should succeed");

    assert_eq!(removed, 2);
    let remaining = parley
        .offline
        .drain("alice@example.com")
        .await
        .expect("drain should succeed");
    assert_eq!(remaining.len(), 1);
    assert!(
        remaining
            .first()
            .is_some_and(|stanza| stanza.xml().contains("third"))
    );
    Ok(())
}

#[rstest]
#[ignore = "requires PARLEY_TEST_DATABASE_URL"]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_recipient_is_reported() -> Result<(), BoxError> {
    let parley = PostgresParley::provision()?;

    let outcome = parley
        .offline
        .enqueue(
            "nobody@example.com",
            &chat("bob@example.com", "nobody@example.com", "hello"),
        )
        .await
        .expect("enqueue should succeed");

    assert_eq!(outcome, EnqueueOutcome::UnknownUser);
    Ok(())
}

#[rstest]
#[ignore = "requires PARLEY_TEST_DATABASE_URL"]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_the_account_empties_its_queue() -> Result<(), BoxError> {
    let parley = PostgresParley::provision()?;
    register(&parley, "alice@example.com").await;
    parley
        .offline
        .enqueue(
            "alice@example.com",
            &chat("bob@example.com", "alice@example.com", "hello"),
        )
        .await
        .expect("enqueue should succeed");

    parley
        .accounts
        .delete_user("alice@example.com")
        .await
        .expect("delete should succeed");

    let count = parley
        .offline
        .pending_count("alice@example.com")
        .await
        .expect("count should succeed");
    assert_eq!(count, 0);
    Ok(())
}
