//! Flash data: values that live for exactly one following request.
//!
//! The bag holds two buckets. `flash` writes to the "next" bucket; on the first start of every
//! request the "next" bucket is promoted to "this" and a fresh "next" bucket begins. Readers
//! consume from "this".

use serde_json::Value;

use crate::session::types::{FLASH_NEXT_KEY, FLASH_THIS_KEY};
use crate::storage::{SessionBag, SessionStore};

use super::accessor::LazySession;

/// Run `f` on the bucket stored under `name`, treating a missing or non-object entry as empty.
/// The bucket is written back as an object afterwards.
fn with_bucket<R>(bag: &mut SessionBag, name: &str, f: impl FnOnce(&mut SessionBag) -> R) -> R {
    let mut bucket = match bag.remove(name) {
        Some(Value::Object(map)) => map,
        _ => SessionBag::new(),
    };
    let result = f(&mut bucket);
    bag.insert(name.to_string(), Value::Object(bucket));
    result
}

fn bucket(bag: &SessionBag, name: &str) -> SessionBag {
    match bag.get(name) {
        Some(Value::Object(map)) => map.clone(),
        _ => SessionBag::new(),
    }
}

impl<S: SessionStore> LazySession<S> {
    /// Promote last request's flash data. Runs once per accessor.
    pub(super) fn rotate_flash(&mut self) {
        // Set first: nothing below may trigger a second rotation
        self.flash_rotated = true;

        let bag = self.store.bag_mut();
        let promoted = match bag.remove(FLASH_NEXT_KEY) {
            Some(Value::Object(map)) => map,
            _ => SessionBag::new(),
        };
        tracing::debug!("Promoted {} flash value(s) to this request", promoted.len());
        bag.insert(FLASH_THIS_KEY.to_string(), Value::Object(promoted));
        bag.insert(FLASH_NEXT_KEY.to_string(), Value::Object(SessionBag::new()));
    }

    /// Store a value for the next request. It can be inspected now with
    /// [`LazySession::flash_get_next`].
    pub fn flash(&mut self, key: &str, value: impl Into<Value>) {
        self.start();
        let value = value.into();
        with_bucket(self.store.bag_mut(), FLASH_NEXT_KEY, |next| {
            next.insert(key.to_string(), value);
        });
    }

    /// Whether flash data for this request exists under `key`.
    pub fn flash_has(&mut self, key: &str) -> bool {
        self.start();
        bucket(self.store.bag(), FLASH_THIS_KEY).contains_key(key)
    }

    /// Flash value for this request. With `delete_after_read` the value is consumed and later
    /// reads in the same request return `None`.
    pub fn flash_get(&mut self, key: &str, delete_after_read: bool) -> Option<Value> {
        self.start();
        with_bucket(self.store.bag_mut(), FLASH_THIS_KEY, |this| {
            if delete_after_read {
                this.remove(key)
            } else {
                this.get(key).cloned()
            }
        })
    }

    pub fn flash_get_or(&mut self, key: &str, default: Value, delete_after_read: bool) -> Value {
        self.flash_get(key, delete_after_read).unwrap_or(default)
    }

    /// All flash data for this request, optionally consuming it.
    pub fn flash_get_all(&mut self, delete_after_read: bool) -> SessionBag {
        self.start();
        with_bucket(self.store.bag_mut(), FLASH_THIS_KEY, |this| {
            if delete_after_read {
                std::mem::take(this)
            } else {
                this.clone()
            }
        })
    }

    /// Peek at a value flashed during this request. Never consumes.
    pub fn flash_get_next(&mut self, key: &str) -> Option<Value> {
        self.start();
        bucket(self.store.bag(), FLASH_NEXT_KEY).get(key).cloned()
    }

    pub fn flash_get_next_or(&mut self, key: &str, default: Value) -> Value {
        self.flash_get_next(key).unwrap_or(default)
    }

    pub fn flash_get_all_next(&mut self) -> SessionBag {
        self.start();
        bucket(self.store.bag(), FLASH_NEXT_KEY)
    }

    /// Carry every flash value still present for this request over to the next one.
    /// Values already consumed are not preserved.
    pub fn flash_preserve(&mut self) {
        self.start();
        let current = bucket(self.store.bag(), FLASH_THIS_KEY);
        tracing::debug!("Preserving {} flash value(s)", current.len());
        for (key, value) in current {
            self.flash(&key, value);
        }
    }
}
