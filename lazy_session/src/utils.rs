use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use ring::rand::SecureRandom;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum UtilError {
    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Invalid format: {0}")]
    Format(String),
}

pub(crate) fn gen_random_bytes(len: usize) -> Result<Vec<u8>, UtilError> {
    let rng = ring::rand::SystemRandom::new();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes)
        .map_err(|_| UtilError::Crypto("Failed to generate random bytes".to_string()))?;
    Ok(bytes)
}

/// Random base64url string built from `len` bytes of system randomness. Used for session ids.
pub(crate) fn gen_random_string(len: usize) -> Result<String, UtilError> {
    let bytes = gen_random_bytes(len)?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Random lowercase hex string built from `len` bytes; the result is `2 * len` characters long.
pub(crate) fn gen_random_hex(len: usize) -> Result<String, UtilError> {
    let bytes = gen_random_bytes(len)?;
    Ok(hex::encode(bytes))
}

/// Session ids travel in cookies, so only the base64url alphabet is accepted.
pub(crate) fn validate_session_id(id: &str) -> Result<(), UtilError> {
    if id.is_empty() {
        return Err(UtilError::Format("Session id is empty".to_string()));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(UtilError::Format(format!(
            "Session id contains invalid characters: {id:?}"
        )));
    }
    Ok(())
}
