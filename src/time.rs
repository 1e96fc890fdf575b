//! Timestamp precision shared by every adapter.

use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;

/// Fractional-second digits kept by `TIMESTAMPTZ` columns.
pub const STORED_SUBSEC_DIGITS: u16 = 6;

/// Reads `clock` and truncates to the precision the store keeps.
#[must_use]
pub fn stored_now<C: Clock + ?Sized>(clock: &C) -> DateTime<Utc> {
    clock.utc().trunc_subsecs(STORED_SUBSEC_DIGITS)
}
