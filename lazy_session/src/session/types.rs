//! Reserved keys inside the session bag

/// Flash values written during this request, surfaced on the next one.
pub(crate) const FLASH_NEXT_KEY: &str = "__flashedNextRequest";

/// Flash values promoted from the previous request.
pub(crate) const FLASH_THIS_KEY: &str = "__flashedThisRequest";

pub(crate) const CSRF_TOKEN_KEY: &str = "__csrf_token";
