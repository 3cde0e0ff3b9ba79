use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Cookie, HeaderMapExt};
use http::{HeaderValue, StatusCode, header::SET_COOKIE, request::Parts};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use lazy_session::{
    LazySession, MemorySessionStore, SESSION_GC_MAX_LIFETIME, SESSION_NAME, SaveHandler,
    SessionStore, StoreStatus,
};

/// Shared persistence for every request's session.
#[derive(Clone)]
pub(crate) struct SessionBackend {
    handler: Arc<dyn SaveHandler>,
}

impl SessionBackend {
    pub(crate) fn new(handler: Arc<dyn SaveHandler>) -> Self {
        Self { handler }
    }
}

/// The request's session accessor, available as an Axum extractor once
/// [`session_middleware`] is installed.
#[derive(Clone)]
pub(crate) struct Session(Arc<Mutex<LazySession<MemorySessionStore>>>);

impl Session {
    pub(crate) async fn lock(&self) -> MutexGuard<'_, LazySession<MemorySessionStore>> {
        self.0.lock().await
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Session>().cloned().ok_or_else(|| {
            tracing::error!("Session middleware is not installed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Session unavailable")
        })
    }
}

/// Build one accessor per request from the session cookie, commit it after the handler and
/// tell the client about id changes.
pub(crate) async fn session_middleware(
    State(backend): State<SessionBackend>,
    mut req: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let incoming_id = req
        .headers()
        .typed_get::<Cookie>()
        .and_then(|cookies| cookies.get(SESSION_NAME.as_str()).map(str::to_string));

    let store = MemorySessionStore::new(backend.handler.clone()).with_id(incoming_id.clone());
    let accessor = LazySession::new(store).map_err(|e| {
        tracing::error!("Failed to create session accessor: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    let session = Session(Arc::new(Mutex::new(accessor)));
    req.extensions_mut().insert(session.clone());

    let mut response = next.run(req).await;

    let (name, outgoing_id, destroyed) = {
        let mut accessor = session.lock().await;
        let was_active = accessor.store().status() == StoreStatus::Active;
        if !accessor.commit() && was_active {
            // Never hand out a cookie for a session that was not saved
            tracing::error!("Failed to commit session");
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save session".to_string(),
            ));
        }
        let destroyed = accessor.store().is_destroyed();
        let name = accessor.session_name(None);
        (name, accessor.store_mut().id(None), destroyed)
    };

    let cookie = if destroyed {
        incoming_id
            .is_some()
            .then(|| session_cookie(&name, "deleted", -86400))
    } else if !outgoing_id.is_empty() && incoming_id.as_deref() != Some(outgoing_id.as_str()) {
        let max_age = i64::try_from(*SESSION_GC_MAX_LIFETIME).unwrap_or(i64::MAX);
        Some(session_cookie(&name, &outgoing_id, max_age))
    } else {
        None
    };

    match cookie {
        Some(Ok(value)) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Some(Err(e)) => {
            tracing::error!("Failed to build session cookie: {}", e);
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
        None => {}
    }

    Ok(response)
}

fn session_cookie(
    name: &str,
    value: &str,
    max_age: i64,
) -> Result<HeaderValue, http::header::InvalidHeaderValue> {
    let cookie = format!("{name}={value}; SameSite=Lax; HttpOnly; Path=/; Max-Age={max_age}");
    HeaderValue::from_str(&cookie)
}
