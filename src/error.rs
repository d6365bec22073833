use crate::value::ValueKind;

use thiserror::Error;

/// Errors returned by [`Cache`](crate::Cache) operations.
///
/// None of these are fatal. A failed operation leaves the cache as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The key is absent, or its entry has expired.
    #[error("item {0} not found")]
    NotFound(String),

    /// `add` was called for a key that still holds a live entry.
    #[error("item {0} already exists")]
    AlreadyExists(String),

    /// An arithmetic operation met a value of the wrong kind.
    #[error("the value for {key} is {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        found: ValueKind,
        expected: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, CacheError>;
