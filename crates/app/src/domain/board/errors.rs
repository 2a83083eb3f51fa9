//! Board service errors.

use thiserror::Error;

use crate::storage::StorageError;

/// Chef board errors.
#[derive(Debug, Error)]
pub enum BoardServiceError {
    /// No order with the given id is on the board.
    #[error("order not found")]
    NotFound,

    /// The item index is outside the order snapshot.
    #[error("order item not found")]
    ItemNotFound,

    /// Someone else edited the record since it was read.
    #[error("stale order version: expected {expected}, found {actual}")]
    VersionConflict {
        /// Version the caller based their edit on.
        expected: u64,
        /// Version currently on the board.
        actual: u64,
    },

    /// Underlying storage failure.
    #[error("storage error")]
    Storage(#[from] StorageError),

    /// A persisted board record failed to decode.
    #[error("corrupt board record")]
    Serde(#[from] serde_json::Error),
}
