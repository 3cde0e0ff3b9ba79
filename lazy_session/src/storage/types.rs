use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::storage::errors::StorageError;

/// Per-client key/value data. Values are arbitrary JSON.
pub type SessionBag = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreStatus {
    /// Sessions are administratively turned off; nothing can be started.
    Disabled,
    /// Sessions are available but none is running for this request.
    Inactive,
    /// A session is running and its bag is loaded.
    Active,
}

/// Persistence backend behind a session engine.
///
/// Ids are opaque strings; `data` is whatever encoding the engine chose for the bag.
pub trait SaveHandler: Send + Sync + 'static {
    /// Called before the first read of a request.
    fn open(&self, save_path: &str, name: &str) -> Result<(), StorageError>;

    /// Called after the final write of a request.
    fn close(&self) -> Result<(), StorageError>;

    /// Encoded session data, or `None` for an unknown id.
    fn read(&self, id: &str) -> Result<Option<String>, StorageError>;

    fn write(&self, id: &str, data: &str) -> Result<(), StorageError>;

    /// Removing an unknown id is not an error.
    fn destroy(&self, id: &str) -> Result<(), StorageError>;

    /// Drop records untouched for more than `max_lifetime` seconds. Returns how many were removed.
    fn gc(&self, max_lifetime: u64) -> Result<usize, StorageError>;
}

/// The session engine as seen by one request.
///
/// Implementations own the bag for the running request and are expected to serialize access
/// per session id themselves; the accessor layered on top performs no locking.
pub trait SessionStore: Send {
    fn status(&self) -> StoreStatus;

    /// Make the session active for this request. Idempotent. `false` if it cannot be activated.
    fn start(&mut self) -> bool;

    fn bag(&self) -> &SessionBag;

    fn bag_mut(&mut self) -> &mut SessionBag;

    /// Flush the bag and end the write phase. The bag stays readable afterwards.
    fn commit(&mut self) -> bool;

    /// Invalidate the stored session. The bag stays readable until the next request.
    fn destroy(&mut self) -> bool;

    /// End the session without writing pending changes.
    fn abort(&mut self);

    /// Move the session to a fresh id, optionally deleting the old stored record.
    fn regenerate_id(&mut self, delete_old: bool) -> bool;

    /// Current name, or set a new one (before start only) and return the previous one.
    fn name(&mut self, new_name: Option<&str>) -> String;

    /// Current id, or set a new one (before start only) and return the previous one.
    fn id(&mut self, new_id: Option<&str>) -> String;

    /// Current save path, or set a new one (before start only) and return the previous one.
    fn save_path(&mut self, new_path: Option<&str>) -> String;

    /// Swap the persistence backend (before start only). With `register_shutdown` the session is
    /// committed automatically when the store goes away.
    fn set_save_handler(&mut self, handler: Arc<dyn SaveHandler>, register_shutdown: bool)
    -> bool;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredSession {
    pub(crate) data: String,
    pub(crate) updated_at: DateTime<Utc>,
}

/// Process-local `SaveHandler`. Shared between requests through an `Arc`.
#[derive(Debug, Default)]
pub struct InMemorySaveHandler {
    pub(super) entry: Mutex<HashMap<String, StoredSession>>,
}

/// `SessionStore` handle for a single request, backed by any `SaveHandler`.
pub struct MemorySessionStore {
    pub(super) handler: Arc<dyn SaveHandler>,
    pub(super) status: StoreStatus,
    pub(super) name: String,
    pub(super) id: String,
    pub(super) save_path: String,
    pub(super) strict_mode: bool,
    pub(super) commit_on_drop: bool,
    pub(super) destroyed: bool,
    pub(super) bag: SessionBag,
}
