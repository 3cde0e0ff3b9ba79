use axum::{
    Router, middleware,
    routing::{get, post},
};
use lazy_session::SaveHandler;
use std::sync::Arc;

use crate::handlers::{index, login, logout};
use crate::session::{SessionBackend, session_middleware};

pub(crate) fn app(handler: Arc<dyn SaveHandler>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .layer(middleware::from_fn_with_state(
            SessionBackend::new(handler),
            session_middleware,
        ))
}
