use lazy_session::InMemorySaveHandler;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod handlers;
mod router;
mod server;
mod session;

use crate::{
    config::DEMO_PORT,
    router::app,
    server::{spawn_http_server, spawn_session_gc},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,lazy_session=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let handler = Arc::new(InMemorySaveHandler::new());
    let _gc = spawn_session_gc(handler.clone());

    let http_server = spawn_http_server(*DEMO_PORT, app(handler));
    http_server.await?;
    Ok(())
}
