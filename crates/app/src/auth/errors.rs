//! Auth service errors.

use thiserror::Error;

use crate::storage::StorageError;

/// Identity provider errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// An account with this email already exists.
    #[error("an account with this email already exists")]
    AlreadyExists,

    /// A required registration field is empty.
    #[error("missing required data")]
    MissingRequiredData,

    /// Unknown email or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Underlying storage failure.
    #[error("storage error")]
    Storage(#[from] StorageError),

    /// A persisted account or session record failed to decode.
    #[error("corrupt identity record")]
    Serde(#[from] serde_json::Error),
}
