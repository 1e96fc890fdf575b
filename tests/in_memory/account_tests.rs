//! Account tests over the in-memory adapter.

use super::helpers::{InMemoryParley, parley};
use crate::test_helpers::{chat, jid};
use ::parley::account::domain::{Ask, Contact, Subscription, User};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn roster_fields_survive_a_save(parley: InMemoryParley) {
    let user = User::new(jid("alice@example.com")).with_roster([Contact::new(jid(
        "bob@example.com",
    ))
    .with_name("Bob")
    .with_subscription(Subscription::To)
    .with_ask(Some(Ask::Subscribe))
    .with_groups(["Work", " Friends "])]);

    parley
        .accounts
        .save_user(&user)
        .await
        .expect("save should succeed");
    let stored = parley
        .accounts
        .find_user("alice@example.com")
        .await
        .expect("lookup should succeed")
        .expect("user should exist");

    let bob = stored
        .contact(&jid("bob@example.com"))
        .expect("contact should exist");
    assert_eq!(bob.name(), Some("Bob"));
    assert_eq!(bob.subscription(), Subscription::To);
    assert_eq!(bob.ask(), Some(Ask::Subscribe));
    let groups: Vec<&str> = bob.groups().iter().map(String::as_str).collect();
    assert_eq!(groups, ["Friends", "Work"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_an_account_cascades_to_its_queue(parley: InMemoryParley) {
    parley
        .accounts
        .save_user(&User::new(jid("alice@example.com")))
        .await
        .expect("save should succeed");
    parley
        .offline
        .enqueue(
            "alice@example.com",
            &chat("bob@example.com", "alice@example.com", "hi"),
        )
        .await
        .expect("enqueue should succeed");

    let deleted = parley
        .accounts
        .delete_user("alice@example.com")
        .await
        .expect("delete should succeed");

    assert!(deleted);
    assert_eq!(
        parley
            .offline
            .pending_count("alice@example.com")
            .await
            .expect("count should succeed"),
        0
    );
}
