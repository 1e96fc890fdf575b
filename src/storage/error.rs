//! Error types shared by every repository adapter.

use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::sync::Arc;
use thiserror::Error;

/// Result type for repository operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while talking to the backing store.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// A connection could not be obtained, or the blocking task failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(Arc<dyn std::error::Error + Send + Sync>),

    /// A constraint outside the canonical keys rejected the write.
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// A persisted value could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StorageError {
    /// Creates a database error from any error type.
    #[must_use]
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Database(Arc::new(err))
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Creates an integrity error.
    #[must_use]
    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity(message.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Returns `true` when the error is a fatal constraint violation.
    #[must_use]
    pub const fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity(_))
    }
}

impl From<DieselError> for StorageError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(
                kind @ (DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::NotNullViolation
                | DatabaseErrorKind::CheckViolation),
                info,
            ) => {
                let constraint = info.constraint_name().unwrap_or("unknown constraint");
                Self::Integrity(format!("{kind:?} on {constraint}: {}", info.message()))
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
                Self::Connection(info.message().to_owned())
            }
            other => Self::database(other),
        }
    }
}

impl From<PoolError> for StorageError {
    fn from(err: PoolError) -> Self {
        Self::Connection(err.to_string())
    }
}
