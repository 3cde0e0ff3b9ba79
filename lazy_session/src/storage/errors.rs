use thiserror::Error;

/// Failure reported by a [`SaveHandler`](super::SaveHandler) or while encoding a bag.
#[derive(Debug, Error, Clone)]
pub enum StorageError {
    /// The backend could not perform the operation.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The bag could not be converted to or from its stored form.
    #[error("Session data encoding error: {0}")]
    Serde(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}
