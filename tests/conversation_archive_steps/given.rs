//! Given steps for conversation archive BDD scenarios.

use super::world::ArchiveWorld;
use rstest_bdd_macros::given;

#[given(r#""{from}" has sent "{body}" to "{to}""#)]
fn has_sent(
    world: &mut ArchiveWorld,
    from: String,
    body: String,
    to: String,
) -> Result<(), eyre::Report> {
    world.send(&from, &to, &body)
}
