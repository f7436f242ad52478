use thiserror::Error;

use solarbridge_core::error::CoreError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {key}")]
    NotFound { key: String },

    #[error("object already exists: {key}")]
    AlreadyExists { key: String },

    #[error(transparent)]
    Rejected(#[from] CoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("S3 GetObject error: {0}")]
    GetObject(String),

    #[error("S3 PutObject error: {0}")]
    PutObject(String),

    #[error("S3 ListObjects error: {0}")]
    ListObjects(String),

    #[error("S3 HeadBucket error: {0}")]
    HeadBucket(String),

    #[error("credential error: {0}")]
    Credentials(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// True when the write was refused because the submission itself is
    /// invalid, as opposed to the backend failing.
    pub fn is_rejected(&self) -> bool {
        matches!(self, StorageError::Rejected(_))
    }
}
