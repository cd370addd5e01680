//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violated preconditions of the hierarchy core.
///
/// Malformed relation data (dangling ids, cycles, duplicate ownership) is not an
/// error: it degrades to partial trees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("root id not present in item set: {0}")]
    UnknownRoot(String),
}
