//! When steps for roster BDD scenarios.

use super::world::{RosterWorld, account_with, run_async};
use rstest_bdd_macros::when;

#[when(r#""{owner}" saves contacts "{first}" and "{second}""#)]
fn saves_contacts(
    world: &mut RosterWorld,
    owner: String,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    let user = account_with(&owner, &[&first, &second])?;
    let changes = run_async(world.accounts.save_user(&user))
        .map_err(|err| eyre::eyre!("roster save failed: {err}"))?;
    world.last_changes = Some(changes);
    Ok(())
}

#[when(r#"the account "{owner}" is deleted"#)]
fn account_deleted(world: &mut RosterWorld, owner: String) -> Result<(), eyre::Report> {
    let deleted = run_async(world.accounts.delete_user(&owner))
        .map_err(|err| eyre::eyre!("delete failed: {err}"))?;
    if !deleted {
        return Err(eyre::eyre!("expected '{owner}' to exist"));
    }
    Ok(())
}
