//! Service layer for accounts and rosters.

mod accounts;

pub use accounts::{AccountError, AccountResult, AccountService};
