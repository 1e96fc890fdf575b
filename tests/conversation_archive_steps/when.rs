//! When steps for conversation archive BDD scenarios.

use super::world::{ArchiveWorld, run_async};
use rstest_bdd_macros::when;

#[when(r#""{from}" sends "{body}" to "{to}""#)]
fn sends(
    world: &mut ArchiveWorld,
    from: String,
    body: String,
    to: String,
) -> Result<(), eyre::Report> {
    world.send(&from, &to, &body)
}

#[when(r#""{jid}" confirms delivery from "{with}""#)]
fn confirms_delivery(
    world: &mut ArchiveWorld,
    jid: String,
    with: String,
) -> Result<(), eyre::Report> {
    run_async(world.renewal.unmark_renewed(&jid, &with))
        .map_err(|err| eyre::eyre!("unmark failed: {err}"))?;
    Ok(())
}
