use axum::Router;
use lazy_session::{SESSION_GC_MAX_LIFETIME, SaveHandler};
use std::{net::SocketAddr, sync::Arc};
use tokio::task::JoinHandle;

use crate::config::SESSION_GC_INTERVAL;

pub(crate) fn spawn_http_server(port: u16, app: Router) -> JoinHandle<()> {
    tokio::spawn(async move {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        tracing::info!("HTTP server listening on {}", addr);
        if let Err(e) = axum_server::bind(addr)
            .serve(app.into_make_service())
            .await
        {
            tracing::error!("HTTP server error: {}", e);
        }
    })
}

/// Periodically drop sessions that have been idle longer than `SESSION_GC_MAX_LIFETIME`.
pub(crate) fn spawn_session_gc(handler: Arc<dyn SaveHandler>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_GC_INTERVAL);
        loop {
            interval.tick().await;
            match handler.gc(*SESSION_GC_MAX_LIFETIME) {
                Ok(0) => {}
                Ok(removed) => tracing::debug!("Session gc removed {} session(s)", removed),
                Err(e) => tracing::error!("Session gc failed: {}", e),
            }
        }
    })
}
