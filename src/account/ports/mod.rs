//! Port contracts for accounts and rosters.

pub mod repository;

#[cfg(test)]
pub use repository::MockUserRepository;
pub use repository::{FragmentRepository, UserRepository};
