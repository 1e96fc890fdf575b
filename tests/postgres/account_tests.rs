//! Account adapter tests against `PostgreSQL`.

use super::helpers::{BoxError, PostgresParley};
use crate::test_helpers::jid;
use minidom::Element;
use parley::account::domain::{Contact, RosterChanges, Subscription, User};
use rstest::rstest;

const MEMBERSHIPS: &str = "SELECT COUNT(*) FROM contacts_groups";
const ORPHANED_MEMBERSHIPS: &str =
    "SELECT COUNT(*) FROM contacts_groups WHERE contact_id NOT IN (SELECT id FROM contacts)";

fn contact(raw: &str) -> Contact {
    Contact::new(jid(raw))
}

#[rstest]
#[ignore = "requires PARLEY_TEST_DATABASE_URL"]
#[tokio::test(flavor = "multi_thread")]
async fn roster_save_merges_by_contact() -> Result<(), BoxError> {
    let parley = PostgresParley::provision()?;
    let original = User::new(jid("alice@example.com"))
        .with_password("secret")
        .with_roster([
            contact("bob@example.com").with_groups(["Friends"]),
            contact("carol@example.com"),
        ]);
    parley
        .accounts
        .save_user(&original)
        .await
        .expect("save should succeed");
    assert_eq!(parley.database.count(MEMBERSHIPS)?, 1);

    let revised = User::new(jid("alice@example.com"))
        .with_password("secret")
        .with_roster([
            contact("carol@example.com")
                .with_subscription(Subscription::Both)
                .with_groups(["Friends", "Work"]),
            contact("dave@example.com"),
        ]);
    let changes = parley
        .accounts
        .save_user(&revised)
        .await
        .expect("save should succeed");

    assert_eq!(
        changes,
        RosterChanges {
            removed: 1,
            updated: 1,
            inserted: 1,
        }
    );
    let stored = parley
        .accounts
        .find_user("alice@example.com")
        .await
        .expect("lookup should succeed")
        .expect("user should exist");
    assert!(stored.contact(&jid("bob@example.com")).is_none());
    let carol = stored
        .contact(&jid("carol@example.com"))
        .expect("carol should remain");
    assert_eq!(carol.subscription(), Subscription::Both);
    assert_eq!(carol.groups().len(), 2);
    assert_eq!(stored.password(), Some("secret"));
    assert_eq!(parley.database.count(MEMBERSHIPS)?, 2);
    assert_eq!(parley.database.count(ORPHANED_MEMBERSHIPS)?, 0);
    Ok(())
}

#[rstest]
#[ignore = "requires PARLEY_TEST_DATABASE_URL"]
#[tokio::test(flavor = "multi_thread")]
async fn groups_are_shared_between_accounts() -> Result<(), BoxError> {
    let parley = PostgresParley::provision()?;
    for owner in ["alice@example.com", "bob@example.com"] {
        let user = User::new(jid(owner))
            .with_roster([contact("carol@example.com").with_groups(["Friends"])]);
        parley
            .accounts
            .save_user(&user)
            .await
            .expect("save should succeed");
    }

    for owner in ["alice@example.com", "bob@example.com"] {
        let stored = parley
            .accounts
            .find_user(owner)
            .await
            .expect("lookup should succeed")
            .expect("user should exist");
        let carol = stored
            .contact(&jid("carol@example.com"))
            .expect("contact should exist");
        assert!(carol.groups().contains("Friends"));
    }
    Ok(())
}

#[rstest]
#[ignore = "requires PARLEY_TEST_DATABASE_URL"]
#[tokio::test(flavor = "multi_thread")]
async fn documents_are_stored_per_account() -> Result<(), BoxError> {
    let parley = PostgresParley::provision()?;
    let card: Element = "<vCard xmlns='vcard-temp'><FN>Alice</FN></vCard>"
        .parse()
        .expect("card should parse");
    let notes: Element = "<storage xmlns='storage:rosternotes'/>"
        .parse()
        .expect("fragment should parse");

    let orphaned = parley
        .accounts
        .save_vcard("alice@example.com", &card)
        .await
        .expect("save should succeed");
    assert!(!orphaned);

    parley
        .accounts
        .save_user(&User::new(jid("alice@example.com")))
        .await
        .expect("save should succeed");
    assert!(
        parley
            .accounts
            .save_vcard("alice@example.com", &card)
            .await
            .expect("save should succeed")
    );
    assert!(
        parley
            .accounts
            .save_fragment("alice@example.com", &notes)
            .await
            .expect("save should succeed")
    );

    let stored_card = parley
        .accounts
        .find_vcard("alice@example.com")
        .await
        .expect("lookup should succeed")
        .expect("card should exist");
    assert_eq!(stored_card, card);
    let stored_notes = parley
        .accounts
        .find_fragment("alice@example.com", "storage", "storage:rosternotes")
        .await
        .expect("lookup should succeed");
    assert_eq!(stored_notes, Some(notes));
    let missing = parley
        .accounts
        .find_fragment("alice@example.com", "storage", "storage:bookmarks")
        .await
        .expect("lookup should succeed");
    assert!(missing.is_none());
    Ok(())
}
