//! Domain model for accounts and rosters.

mod contact;
mod error;
mod roster;
mod user;

pub use contact::{Ask, Contact, Subscription};
pub use error::{ParseAskError, ParseSubscriptionError};
pub use roster::{RosterChanges, RosterDiff};
pub use user::{Fragment, User};
