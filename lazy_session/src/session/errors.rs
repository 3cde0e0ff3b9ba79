use thiserror::Error;

use crate::utils::UtilError;

#[derive(Debug, Error, Clone)]
pub enum SessionError {
    /// The session engine is administratively disabled; the accessor cannot be used.
    #[error("Sessions are disabled in this environment")]
    SessionsUnavailable,

    #[error("Invalid CSRF token length: {0} bytes")]
    InvalidTokenLength(usize),

    #[error("Json conversion(Serde) error: {0}")]
    Serde(String),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}
