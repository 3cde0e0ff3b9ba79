//! Environment-driven settings for the session engine

use std::env;
use std::sync::LazyLock;

/// Name of the session, also used as the cookie name by hosts.
/// Default: "LAZYSESSID"
pub static SESSION_NAME: LazyLock<String> =
    LazyLock::new(|| env::var("SESSION_NAME").unwrap_or_else(|_| "LAZYSESSID".to_string()));

/// When true the engine reports itself as administratively disabled.
pub static SESSION_DISABLED: LazyLock<bool> =
    LazyLock::new(|| parse_bool(env::var("SESSION_DISABLED").ok().as_deref()));

/// Opaque location handed to `SaveHandler::open`.
pub static SESSION_SAVE_PATH: LazyLock<String> =
    LazyLock::new(|| env::var("SESSION_SAVE_PATH").unwrap_or_default());

/// Refuse client-supplied ids that have no stored record.
pub static SESSION_USE_STRICT_MODE: LazyLock<bool> =
    LazyLock::new(|| parse_bool(env::var("SESSION_USE_STRICT_MODE").ok().as_deref()));

pub static SESSION_GC_MAX_LIFETIME: LazyLock<u64> =
    LazyLock::new(|| parse_gc_max_lifetime(env::var("SESSION_GC_MAX_LIFETIME").ok().as_deref()));

pub(crate) static SESSION_ID_BYTES: LazyLock<usize> =
    LazyLock::new(|| parse_id_bytes(env::var("SESSION_ID_BYTES").ok().as_deref()));

const DEFAULT_GC_MAX_LIFETIME: u64 = 1440; // 24 minutes
const DEFAULT_ID_BYTES: usize = 32;
const MIN_ID_BYTES: usize = 16;

fn parse_gc_max_lifetime(value: Option<&str>) -> u64 {
    value
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_GC_MAX_LIFETIME)
}

/// Ids shorter than `MIN_ID_BYTES` are too easy to guess; such values fall back to the default.
fn parse_id_bytes(value: Option<&str>) -> usize {
    value
        .and_then(|s| s.trim().parse().ok())
        .filter(|n| *n >= MIN_ID_BYTES)
        .unwrap_or(DEFAULT_ID_BYTES)
}

fn parse_bool(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}
