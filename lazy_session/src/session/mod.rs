mod config;
mod errors;
mod main;
mod types;

pub use config::CSRF_TOKEN_BYTES;
pub use errors::SessionError;
pub use main::LazySession;
