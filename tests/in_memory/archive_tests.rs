//! End-to-end archive tests over the in-memory adapter.

use super::helpers::{InMemoryParley, parley};
use crate::test_helpers::{chat, epoch, jid};
use ::parley::archive::domain::{RenewedMessage, TimeRange};
use rstest::rstest;

const ALICE_BOB_DIGEST: &str = "037b18088edf37157d2a64c4bc59e8e0c29400d4";

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn three_message_exchange_lands_in_one_collection(parley: InMemoryParley) {
    for (from, to, body) in [
        ("alice@example.com/phone", "bob@example.com", "hi bob"),
        ("bob@example.com/desk", "alice@example.com", "hi alice"),
        ("alice@example.com/laptop", "bob@example.com/desk", "how are you?"),
    ] {
        parley
            .archive
            .append_message(&chat(from, to, body))
            .await
            .expect("append should succeed");
    }

    let collections = parley
        .archive
        .find_collections("bob@example.com", None, TimeRange::default(), 10)
        .await
        .expect("lookup should succeed");
    assert_eq!(collections.total(), 1);
    let collection = collections.items().first().expect("one collection");
    assert_eq!(collection.key().as_str(), ALICE_BOB_DIGEST);

    let messages = parley
        .archive
        .find_messages("bob@example.com", "alice@example.com", epoch(), None, 10)
        .await
        .expect("lookup should succeed");
    let bodies: Vec<&str> = messages.items().iter().map(|message| message.body()).collect();
    assert_eq!(bodies, ["hi bob", "hi alice", "how are you?"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn collection_bounds_are_inclusive(parley: InMemoryParley) {
    for peer in ["b@example.com", "c@example.com", "d@example.com"] {
        parley
            .archive
            .get_or_create_collection("a@example.com", peer)
            .await
            .expect("create should succeed");
    }
    let first = epoch();
    let second = epoch() + chrono::Duration::seconds(1);

    let page = parley
        .archive
        .find_collections(
            "a@example.com",
            None,
            TimeRange::new(Some(first), Some(second)),
            10,
        )
        .await
        .expect("lookup should succeed");

    let peers: Vec<String> = page
        .items()
        .iter()
        .map(|collection| collection.peer_of(&jid("a@example.com")).to_string())
        .collect();
    assert_eq!(peers, ["b@example.com", "c@example.com"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn renewal_replays_until_unmarked(parley: InMemoryParley) {
    parley
        .archive
        .append_message(&chat("bob@example.com", "alice@example.com", "ping"))
        .await
        .expect("append should succeed");
    let mut replayed: Vec<RenewedMessage> = Vec::new();

    let visited = parley
        .renewal
        .fetch_renewed("alice@example.com", |message| replayed.push(message))
        .expect("fetch should succeed");
    assert_eq!(visited, 1);
    assert_eq!(
        replayed,
        [RenewedMessage {
            from: jid("bob@example.com"),
            to: jid("alice@example.com"),
            body: "ping".to_owned(),
        }]
    );

    parley
        .renewal
        .unmark_renewed("alice@example.com", "bob@example.com")
        .await
        .expect("unmark should succeed");
    let again = parley
        .renewal
        .fetch_renewed("alice@example.com", |_| {})
        .expect("fetch should succeed");
    assert_eq!(again, 0);
}
