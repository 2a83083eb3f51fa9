//! Orders persistence errors.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors reading or writing the per-user order records.
#[derive(Debug, Error)]
pub enum OrdersRepositoryError {
    /// Underlying storage failure.
    #[error("storage error")]
    Storage(#[from] StorageError),

    /// A persisted record failed to decode.
    #[error("corrupt order record")]
    Serde(#[from] serde_json::Error),

    /// The persisted wheel timestamp is not a valid epoch-millisecond value.
    #[error("invalid wheel timestamp: {0}")]
    InvalidTimestamp(String),
}
