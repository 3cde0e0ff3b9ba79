use std::env;
use std::sync::LazyLock;

const DEFAULT_CSRF_TOKEN_BYTES: usize = 20;

/// Random bytes behind a CSRF token. The hex-encoded token is twice as long.
pub static CSRF_TOKEN_BYTES: LazyLock<usize> =
    LazyLock::new(|| parse_token_bytes(env::var("CSRF_TOKEN_BYTES").ok().as_deref()));

fn parse_token_bytes(value: Option<&str>) -> usize {
    value
        .and_then(|s| s.trim().parse().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_CSRF_TOKEN_BYTES)
}
