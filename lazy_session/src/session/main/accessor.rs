use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::session::errors::SessionError;
use crate::storage::{SaveHandler, SessionBag, SessionStore, StoreStatus};

/// Session accessor for one request.
///
/// Wraps a [`SessionStore`] and starts it on first use, so handlers never have to. The first
/// successful start also promotes last request's flash data (see [`LazySession::flash`]).
///
/// Create one accessor per request; the flash rotation flag lives only as long as this value.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use lazy_session::{InMemorySaveHandler, LazySession, MemorySessionStore};
/// use serde_json::json;
///
/// let handler = Arc::new(InMemorySaveHandler::new());
/// let mut session = LazySession::new(MemorySessionStore::new(handler)).unwrap();
///
/// session.set("username", json!("demo"));
/// assert_eq!(session.get("username"), Some(json!("demo")));
/// ```
pub struct LazySession<S: SessionStore> {
    pub(super) store: S,
    pub(super) flash_rotated: bool,
}

impl<S: SessionStore> LazySession<S> {
    /// Wrap a store. Fails with [`SessionError::SessionsUnavailable`] when the engine reports
    /// sessions as disabled.
    pub fn new(store: S) -> Result<Self, SessionError> {
        if store.status() == StoreStatus::Disabled {
            tracing::error!("Sessions are disabled, refusing to build a session accessor");
            return Err(SessionError::SessionsUnavailable);
        }
        Ok(Self {
            store,
            flash_rotated: false,
        })
    }

    /// Start the session if it is not running yet.
    ///
    /// Every other method calls this first, so calling it directly is only needed to find out
    /// whether session state is actually available for this request.
    pub fn start(&mut self) -> bool {
        if self.store.status() == StoreStatus::Active || self.store.start() {
            if !self.flash_rotated {
                self.rotate_flash();
            }
            return true;
        }
        false
    }

    /// Value stored under `key`, if any.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        self.start();
        self.store.bag().get(key).cloned()
    }

    /// Value stored under `key`, or `default` when the key is absent.
    pub fn get_or(&mut self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    /// Value stored under `key`, decoded into `T`.
    pub fn get_as<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>, SessionError> {
        self.get(key)
            .map(serde_json::from_value)
            .transpose()
            .map_err(SessionError::from)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.start();
        self.store.bag_mut().insert(key.to_string(), value.into());
    }

    /// Encode `value` as JSON and store it under `key`.
    pub fn set_as<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), SessionError> {
        let value = serde_json::to_value(value)?;
        self.set(key, value);
        Ok(())
    }

    pub fn has(&mut self, key: &str) -> bool {
        self.start();
        self.store.bag().contains_key(key)
    }

    /// Remove `key`. Absent keys are ignored.
    pub fn delete(&mut self, key: &str) {
        self.start();
        self.store.bag_mut().remove(key);
    }

    /// Empty the whole bag, effective immediately for this request.
    ///
    /// Prefer this over [`LazySession::destroy`] for logging a user out: destroy only takes
    /// effect from the next request on.
    pub fn clear(&mut self) {
        self.start();
        *self.store.bag_mut() = SessionBag::new();
    }

    /// Snapshot of the whole bag, reserved keys included.
    pub fn get_all(&mut self) -> SessionBag {
        self.start();
        self.store.bag().clone()
    }

    /// Flush the session to the engine and end the write phase.
    ///
    /// Long-running handlers should call this as early as possible so the engine can release
    /// the session for concurrent requests.
    pub fn commit(&mut self) -> bool {
        self.store.commit()
    }

    /// Invalidate the stored session. Values stay readable until the next request; use
    /// [`LazySession::clear`] to drop them now.
    pub fn destroy(&mut self) -> bool {
        self.start();
        self.store.destroy()
    }

    /// End the session without writing changes made during this request.
    pub fn abort(&mut self) {
        self.store.abort();
    }

    /// Move the session to a new id. Call on every privilege change, such as a login.
    pub fn regenerate_id(&mut self, delete_old: bool) -> bool {
        self.start();
        self.store.regenerate_id(delete_old)
    }

    /// Session name. A non-empty `new_name` replaces it (before start only) and the old name
    /// is returned.
    pub fn session_name(&mut self, new_name: Option<&str>) -> String {
        self.store.name(new_name)
    }

    /// Session id. Reading starts the session so that an id exists; a non-empty `new_id`
    /// replaces it (before start only) and the old id is returned.
    pub fn session_id(&mut self, new_id: Option<&str>) -> String {
        if new_id.is_some_and(|id| !id.is_empty()) {
            return self.store.id(new_id);
        }
        self.start();
        self.store.id(None)
    }

    pub fn save_path(&mut self, new_path: Option<&str>) -> String {
        self.store.save_path(new_path)
    }

    pub fn set_save_handler(
        &mut self,
        handler: Arc<dyn SaveHandler>,
        register_shutdown: bool,
    ) -> bool {
        self.store.set_save_handler(handler, register_shutdown)
    }

    /// The wrapped engine, without starting it.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
