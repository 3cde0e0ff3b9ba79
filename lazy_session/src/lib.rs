//! lazy_session - Lazily started session accessor for web request handlers
//!
//! [`LazySession`] wraps a session engine ([`SessionStore`]) and starts it on first use. On top
//! of plain key/value access it provides flash data, values that survive exactly one following
//! request, and per-session CSRF tokens compared in constant time.
//!
//! The engine itself (cookie transport, id generation, persistence) is supplied by the host.
//! [`MemorySessionStore`] over an [`InMemorySaveHandler`] is a process-local engine for tests
//! and demos.

mod session;
mod storage;
mod utils;

#[cfg(test)]
mod test_utils;

pub use session::{CSRF_TOKEN_BYTES, LazySession, SessionError};

pub use storage::{
    InMemorySaveHandler, MemorySessionStore, SESSION_DISABLED, SESSION_GC_MAX_LIFETIME,
    SESSION_NAME, SESSION_SAVE_PATH, SESSION_USE_STRICT_MODE, SaveHandler, SessionBag,
    SessionStore, StorageError, StoreStatus,
};

pub use utils::UtilError;
