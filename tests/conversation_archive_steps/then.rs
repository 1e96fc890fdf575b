//! Then steps for conversation archive BDD scenarios.

use super::world::{ArchiveWorld, run_async};
use crate::test_helpers::epoch;
use parley::archive::domain::TimeRange;
use rstest_bdd_macros::then;

#[then(r#""{jid}" takes part in {count:usize} collection"#)]
fn takes_part_in(world: &ArchiveWorld, jid: String, count: usize) -> Result<(), eyre::Report> {
    let page = run_async(
        world
            .archive
            .find_collections(&jid, None, TimeRange::default(), 10),
    )
    .map_err(|err| eyre::eyre!("collection lookup failed: {err}"))?;
    if page.total() != u64::try_from(count)? {
        return Err(eyre::eyre!(
            "expected {count} collections, found {}",
            page.total()
        ));
    }
    Ok(())
}

#[then(r#"the collection of "{jid}" and "{with}" has key "{key}""#)]
fn collection_has_key(
    world: &ArchiveWorld,
    jid: String,
    with: String,
    key: String,
) -> Result<(), eyre::Report> {
    let page = run_async(
        world
            .archive
            .find_collections(&jid, Some(&with), TimeRange::default(), 1),
    )
    .map_err(|err| eyre::eyre!("collection lookup failed: {err}"))?;
    let collection = page
        .items()
        .first()
        .ok_or_else(|| eyre::eyre!("no collection between '{jid}' and '{with}'"))?;
    if collection.key().as_str() != key {
        return Err(eyre::eyre!(
            "expected key {key}, found {}",
            collection.key().as_str()
        ));
    }
    Ok(())
}

#[then(r#""{jid}" reads {count:usize} messages from "{with}" in sending order"#)]
fn reads_in_order(
    world: &ArchiveWorld,
    jid: String,
    count: usize,
    with: String,
) -> Result<(), eyre::Report> {
    let page = run_async(world.archive.find_messages(&jid, &with, epoch(), None, 10))
        .map_err(|err| eyre::eyre!("message lookup failed: {err}"))?;
    let items = page.items();
    if items.len() != count {
        return Err(eyre::eyre!(
            "expected {count} messages, found {}",
            items.len()
        ));
    }
    if !items
        .windows(2)
        .all(|pair| matches!(pair, [earlier, later] if earlier.created_at() <= later.created_at()))
    {
        return Err(eyre::eyre!("messages are not in creation order"));
    }
    Ok(())
}

#[then(r#""{jid}" has {count:usize} messages to renew"#)]
fn messages_to_renew(world: &ArchiveWorld, jid: String, count: usize) -> Result<(), eyre::Report> {
    let visited = world
        .renewal
        .fetch_renewed(&jid, |_| {})
        .map_err(|err| eyre::eyre!("renewal fetch failed: {err}"))?;
    if visited != u64::try_from(count)? {
        return Err(eyre::eyre!(
            "expected {count} messages to renew, found {visited}"
        ));
    }
    Ok(())
}
