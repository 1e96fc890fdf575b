//! Then steps for roster BDD scenarios.

use super::world::{RosterWorld, parse_jid, run_async};
use parley::account::domain::RosterChanges;
use rstest_bdd_macros::then;

#[then("the save removed {removed:usize}, updated {updated:usize} and inserted {inserted:usize} contacts")]
fn save_changes(
    world: &RosterWorld,
    removed: usize,
    updated: usize,
    inserted: usize,
) -> Result<(), eyre::Report> {
    let expected = RosterChanges {
        removed,
        updated,
        inserted,
    };
    match world.last_changes {
        Some(changes) if changes == expected => Ok(()),
        other => Err(eyre::eyre!("expected {expected:?}, got {other:?}")),
    }
}

#[then(r#"the roster of "{owner}" lists "{first}" and "{second}""#)]
fn roster_lists(
    world: &RosterWorld,
    owner: String,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    let user = run_async(world.accounts.find_user(&owner))
        .map_err(|err| eyre::eyre!("lookup failed: {err}"))?
        .ok_or_else(|| eyre::eyre!("no account '{owner}'"))?;
    let mut actual: Vec<String> = user
        .roster()
        .iter()
        .map(|contact| contact.jid().to_string())
        .collect();
    let mut expected = vec![parse_jid(&first)?.to_string(), parse_jid(&second)?.to_string()];
    expected.sort();
    actual.sort();
    if actual != expected {
        return Err(eyre::eyre!("expected roster {expected:?}, found {actual:?}"));
    }
    Ok(())
}

#[then(r#""{owner}" has {count:usize} pending stanzas"#)]
fn pending_stanzas(world: &RosterWorld, owner: String, count: usize) -> Result<(), eyre::Report> {
    let pending = run_async(world.offline.pending_count(&owner))
        .map_err(|err| eyre::eyre!("count failed: {err}"))?;
    if pending != u64::try_from(count)? {
        return Err(eyre::eyre!("expected {count} pending stanzas, found {pending}"));
    }
    Ok(())
}
