use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, MutexGuard};

use crate::storage::config::{
    SESSION_DISABLED, SESSION_ID_BYTES, SESSION_NAME, SESSION_SAVE_PATH, SESSION_USE_STRICT_MODE,
};
use crate::storage::errors::StorageError;
use crate::utils::{gen_random_string, validate_session_id};

use super::types::{
    InMemorySaveHandler, MemorySessionStore, SaveHandler, SessionBag, SessionStore, StoreStatus,
    StoredSession,
};

impl InMemorySaveHandler {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory session save handler");
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, StoredSession>>, StorageError> {
        self.entry
            .lock()
            .map_err(|_| StorageError::Storage("Session map lock poisoned".to_string()))
    }

    /// Number of stored sessions.
    pub fn len(&self) -> usize {
        self.lock().map(|entry| entry.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SaveHandler for InMemorySaveHandler {
    fn open(&self, _save_path: &str, _name: &str) -> Result<(), StorageError> {
        Ok(()) // Nothing to open for in-memory storage
    }

    fn close(&self) -> Result<(), StorageError> {
        Ok(())
    }

    fn read(&self, id: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(id).map(|stored| stored.data.clone()))
    }

    fn write(&self, id: &str, data: &str) -> Result<(), StorageError> {
        self.lock()?.insert(
            id.to_string(),
            StoredSession {
                data: data.to_string(),
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }

    fn destroy(&self, id: &str) -> Result<(), StorageError> {
        self.lock()?.remove(id);
        Ok(())
    }

    fn gc(&self, max_lifetime: u64) -> Result<usize, StorageError> {
        // A lifetime too large to represent means nothing can have expired yet
        let Some(cutoff) = i64::try_from(max_lifetime)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| Utc::now().checked_sub_signed(lifetime))
        else {
            return Ok(0);
        };
        let mut entry = self.lock()?;
        let before = entry.len();
        entry.retain(|_, stored| stored.updated_at >= cutoff);
        let removed = before - entry.len();
        if removed > 0 {
            tracing::debug!("Session gc removed {} expired record(s)", removed);
        }
        Ok(removed)
    }
}

impl MemorySessionStore {
    /// A store for one request, configured from the environment.
    pub fn new(handler: Arc<dyn SaveHandler>) -> Self {
        let status = if *SESSION_DISABLED {
            StoreStatus::Disabled
        } else {
            StoreStatus::Inactive
        };
        Self {
            handler,
            status,
            name: SESSION_NAME.to_string(),
            id: String::new(),
            save_path: SESSION_SAVE_PATH.to_string(),
            strict_mode: *SESSION_USE_STRICT_MODE,
            commit_on_drop: true,
            destroyed: false,
            bag: SessionBag::new(),
        }
    }

    /// Resume the session named by the client, typically the value of the session cookie.
    /// Malformed ids are ignored and a fresh one is allocated on start.
    pub fn with_id(mut self, id: Option<String>) -> Self {
        if let Some(id) = id {
            match validate_session_id(&id) {
                Ok(()) => self.id = id,
                Err(e) => tracing::warn!("Ignoring client session id: {}", e),
            }
        }
        self
    }

    pub fn with_strict_mode(mut self, strict_mode: bool) -> Self {
        self.strict_mode = strict_mode;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.status = if disabled {
            StoreStatus::Disabled
        } else {
            StoreStatus::Inactive
        };
        self
    }

    /// Whether `destroy` succeeded during this request.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn new_id() -> Result<String, StorageError> {
        gen_random_string(*SESSION_ID_BYTES).map_err(|e| StorageError::Storage(e.to_string()))
    }

    fn fail_start(&self, context: &str, err: StorageError) -> bool {
        tracing::error!("Failed to start session: {}: {}", context, err);
        if let Err(e) = self.handler.close() {
            tracing::error!("Failed to close save handler: {}", e);
        }
        false
    }
}

impl SessionStore for MemorySessionStore {
    fn status(&self) -> StoreStatus {
        self.status
    }

    fn start(&mut self) -> bool {
        match self.status {
            StoreStatus::Disabled => {
                tracing::warn!("Cannot start session: sessions are disabled");
                return false;
            }
            StoreStatus::Active => return true,
            StoreStatus::Inactive => {}
        }

        if self.destroyed {
            tracing::debug!("Session was destroyed during this request, not restarting");
            return false;
        }

        if let Err(e) = self.handler.open(&self.save_path, &self.name) {
            return self.fail_start("open", e);
        }

        let generated = self.id.is_empty();
        if generated {
            match Self::new_id() {
                Ok(id) => self.id = id,
                Err(e) => return self.fail_start("id generation", e),
            }
        }

        let stored = match self.handler.read(&self.id) {
            Ok(stored) => stored,
            Err(e) => return self.fail_start("read", e),
        };

        if stored.is_none() && !generated && self.strict_mode {
            tracing::debug!("Unknown session id rejected in strict mode");
            match Self::new_id() {
                Ok(id) => self.id = id,
                Err(e) => return self.fail_start("id generation", e),
            }
        }

        let bag = match stored {
            Some(data) => match serde_json::from_str::<SessionBag>(&data) {
                Ok(bag) => bag,
                Err(e) => {
                    tracing::warn!("Stored session data could not be decoded");
                    return self.fail_start("decode", e.into());
                }
            },
            None => SessionBag::new(),
        };

        self.bag = bag;
        self.status = StoreStatus::Active;
        tracing::debug!("Session '{}' started", self.name);
        true
    }

    fn bag(&self) -> &SessionBag {
        &self.bag
    }

    fn bag_mut(&mut self) -> &mut SessionBag {
        &mut self.bag
    }

    fn commit(&mut self) -> bool {
        if self.status != StoreStatus::Active {
            return false;
        }

        let written = serde_json::to_string(&self.bag)
            .map_err(StorageError::from)
            .and_then(|data| self.handler.write(&self.id, &data));
        if let Err(e) = &written {
            tracing::error!("Failed to write session: {}", e);
        }
        if let Err(e) = self.handler.close() {
            tracing::error!("Failed to close save handler: {}", e);
        }

        self.status = StoreStatus::Inactive;
        tracing::debug!("Session '{}' committed", self.name);
        written.is_ok()
    }

    fn destroy(&mut self) -> bool {
        if self.status != StoreStatus::Active {
            tracing::warn!("Cannot destroy session: no active session");
            return false;
        }

        let result = self.handler.destroy(&self.id);
        if let Err(e) = self.handler.close() {
            tracing::error!("Failed to close save handler: {}", e);
        }
        self.status = StoreStatus::Inactive;

        match result {
            Ok(()) => {
                self.destroyed = true;
                self.id.clear();
                tracing::debug!("Session '{}' destroyed", self.name);
                true
            }
            Err(e) => {
                tracing::error!("Failed to destroy session: {}", e);
                false
            }
        }
    }

    fn abort(&mut self) {
        if self.status != StoreStatus::Active {
            return;
        }
        if let Err(e) = self.handler.close() {
            tracing::error!("Failed to close save handler: {}", e);
        }
        self.status = StoreStatus::Inactive;
        tracing::debug!("Session '{}' aborted", self.name);
    }

    fn regenerate_id(&mut self, delete_old: bool) -> bool {
        if self.status != StoreStatus::Active {
            tracing::warn!("Cannot regenerate session id: no active session");
            return false;
        }

        let new_id = match Self::new_id() {
            Ok(id) => id,
            Err(e) => {
                tracing::error!("Failed to generate session id: {}", e);
                return false;
            }
        };

        if delete_old {
            if let Err(e) = self.handler.destroy(&self.id) {
                tracing::error!("Failed to delete old session: {}", e);
                return false;
            }
        }

        self.id = new_id;
        tracing::debug!("Session '{}' moved to a new id", self.name);
        true
    }

    fn name(&mut self, new_name: Option<&str>) -> String {
        let Some(new_name) = new_name.filter(|n| !n.is_empty()) else {
            return self.name.clone();
        };
        if self.status == StoreStatus::Active {
            tracing::warn!("Cannot change session name while the session is active");
            return self.name.clone();
        }
        std::mem::replace(&mut self.name, new_name.to_string())
    }

    fn id(&mut self, new_id: Option<&str>) -> String {
        let Some(new_id) = new_id.filter(|id| !id.is_empty()) else {
            return self.id.clone();
        };
        if self.status == StoreStatus::Active {
            tracing::warn!("Cannot change session id while the session is active");
            return self.id.clone();
        }
        if let Err(e) = validate_session_id(new_id) {
            tracing::warn!("Refusing session id: {}", e);
            return self.id.clone();
        }
        std::mem::replace(&mut self.id, new_id.to_string())
    }

    fn save_path(&mut self, new_path: Option<&str>) -> String {
        let Some(new_path) = new_path.filter(|p| !p.is_empty()) else {
            return self.save_path.clone();
        };
        if self.status == StoreStatus::Active {
            tracing::warn!("Cannot change save path while the session is active");
            return self.save_path.clone();
        }
        std::mem::replace(&mut self.save_path, new_path.to_string())
    }

    fn set_save_handler(
        &mut self,
        handler: Arc<dyn SaveHandler>,
        register_shutdown: bool,
    ) -> bool {
        if self.status == StoreStatus::Active {
            tracing::warn!("Cannot change save handler while the session is active");
            return false;
        }
        self.handler = handler;
        self.commit_on_drop = register_shutdown;
        true
    }
}

impl Drop for MemorySessionStore {
    fn drop(&mut self) {
        if self.commit_on_drop && self.status == StoreStatus::Active {
            self.commit();
        }
    }
}
