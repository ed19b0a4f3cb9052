//! Error types for homehome storage.

use homehome_core::RewardError;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The idempotency key was already used by a committed request.
    #[error("duplicate request: {key}")]
    DuplicateRequest {
        /// The replayed key.
        key: String,
    },

    /// Domain rule rejected the operation.
    #[error(transparent)]
    Reward(#[from] RewardError),
}

impl From<rocksdb::Error> for StoreError {
    fn from(err: rocksdb::Error) -> Self {
        Self::Database(err.to_string())
    }
}
