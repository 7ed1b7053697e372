//! Error types.

use thiserror::Error;

/// Failure to construct a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError {
    /// A table needs at least one bucket.
    #[error("invalid capacity: a table needs at least one bucket")]
    InvalidCapacity,
}

/// Returned by `check_invariants` when the chain structure is inconsistent.
/// Carries a description of the invariant that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    pub(crate) fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}
