//! Given steps for roster BDD scenarios.

use super::world::{RosterWorld, account_with, run_async};
use crate::test_helpers::chat;
use rstest_bdd_macros::given;

#[given(r#""{owner}" has contacts "{first}" and "{second}""#)]
fn has_contacts(
    world: &mut RosterWorld,
    owner: String,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    let user = account_with(&owner, &[&first, &second])?;
    run_async(world.accounts.save_user(&user))
        .map_err(|err| eyre::eyre!("seeding roster failed: {err}"))?;
    Ok(())
}

#[given(r#""{from}" has queued "{body}" for "{to}""#)]
fn has_queued(
    world: &mut RosterWorld,
    from: String,
    body: String,
    to: String,
) -> Result<(), eyre::Report> {
    let outcome = run_async(world.offline.enqueue(&to, &chat(&from, &to, &body)))
        .map_err(|err| eyre::eyre!("enqueue failed: {err}"))?;
    if !outcome.is_queued() {
        return Err(eyre::eyre!("expected the stanza to be queued, got {outcome:?}"));
    }
    Ok(())
}
