//! Test utilities for session module tests

use std::sync::Arc;

use crate::session::errors::SessionError;
use crate::storage::{InMemorySaveHandler, MemorySessionStore, SessionStore};
use crate::test_utils::init_test_environment;

use super::accessor::LazySession;

/// Fresh shared backend standing in for the session engine's storage
pub(crate) fn new_handler() -> Arc<InMemorySaveHandler> {
    init_test_environment();
    Arc::new(InMemorySaveHandler::new())
}

/// Accessor for one request, resuming `id` when given
pub(crate) fn new_session(
    handler: &Arc<InMemorySaveHandler>,
    id: Option<&str>,
) -> LazySession<MemorySessionStore> {
    let store = MemorySessionStore::new(handler.clone())
        .with_disabled(false)
        .with_strict_mode(false)
        .with_id(id.map(str::to_string));
    LazySession::new(store).expect("test store is enabled")
}

pub(crate) fn disabled_session() -> Result<LazySession<MemorySessionStore>, SessionError> {
    init_test_environment();
    let handler = Arc::new(InMemorySaveHandler::new());
    LazySession::new(MemorySessionStore::new(handler).with_disabled(true))
}

/// End `previous` the way a host would and open the same session for the following request
pub(crate) fn next_request(
    handler: &Arc<InMemorySaveHandler>,
    mut previous: LazySession<MemorySessionStore>,
) -> LazySession<MemorySessionStore> {
    let id = previous.store_mut().id(None);
    previous.commit();
    drop(previous);
    new_session(handler, (!id.is_empty()).then_some(id.as_str()))
}
