//! Parse errors for persisted roster states.

use thiserror::Error;

/// A stored subscription value is not one of `none`, `to`, `from`, `both`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown subscription state: {0}")]
pub struct ParseSubscriptionError(pub String);

/// A stored ask value is not `subscribe`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown ask state: {0}")]
pub struct ParseAskError(pub String);
