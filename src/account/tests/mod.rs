//! Unit tests for accounts and rosters.
