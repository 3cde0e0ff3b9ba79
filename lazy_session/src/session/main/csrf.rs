use serde_json::Value;
use subtle::ConstantTimeEq;

use crate::session::config::CSRF_TOKEN_BYTES;
use crate::session::errors::SessionError;
use crate::session::types::CSRF_TOKEN_KEY;
use crate::storage::SessionStore;
use crate::utils::gen_random_hex;

use super::accessor::LazySession;

impl<S: SessionStore> LazySession<S> {
    /// The session's CSRF token, issuing one first if none exists.
    pub fn csrf_token(&mut self) -> Result<String, SessionError> {
        match self.stored_csrf_token() {
            Some(token) => Ok(token),
            None => self.regenerate_csrf_token(),
        }
    }

    pub fn has_csrf_token(&mut self) -> bool {
        self.stored_csrf_token().is_some()
    }

    /// Replace the CSRF token with a fresh one of `CSRF_TOKEN_BYTES` random bytes.
    pub fn regenerate_csrf_token(&mut self) -> Result<String, SessionError> {
        self.regenerate_csrf_token_with_length(*CSRF_TOKEN_BYTES)
    }

    /// Replace the CSRF token with `byte_length` random bytes, hex-encoded. The token is
    /// `2 * byte_length` characters long.
    pub fn regenerate_csrf_token_with_length(
        &mut self,
        byte_length: usize,
    ) -> Result<String, SessionError> {
        if byte_length == 0 {
            return Err(SessionError::InvalidTokenLength(byte_length));
        }
        let token = gen_random_hex(byte_length)?;
        self.set(CSRF_TOKEN_KEY, token.clone());
        tracing::debug!("Issued new CSRF token");
        Ok(token)
    }

    /// Compare `candidate` with the session's token in constant time.
    ///
    /// A session without a token never validates anything.
    pub fn validate_csrf_token(&mut self, candidate: &str) -> bool {
        let Some(token) = self.stored_csrf_token() else {
            tracing::debug!("No CSRF token in session");
            return false;
        };
        let valid: bool = token.as_bytes().ct_eq(candidate.as_bytes()).into();
        if !valid {
            tracing::debug!("CSRF token mismatch");
        }
        valid
    }

    // Only a non-empty string counts as a token; anything else is treated as absent.
    fn stored_csrf_token(&mut self) -> Option<String> {
        match self.get(CSRF_TOKEN_KEY) {
            Some(Value::String(token)) if !token.is_empty() => Some(token),
            _ => None,
        }
    }
}
