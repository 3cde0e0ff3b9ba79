mod config;
mod errors;
mod memory;
mod types;

pub use config::{
    SESSION_DISABLED, SESSION_GC_MAX_LIFETIME, SESSION_NAME, SESSION_SAVE_PATH,
    SESSION_USE_STRICT_MODE,
};
pub use errors::StorageError;
pub use types::{
    InMemorySaveHandler, MemorySessionStore, SaveHandler, SessionBag, SessionStore, StoreStatus,
};
