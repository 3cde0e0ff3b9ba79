use std::sync::LazyLock;
use std::time::Duration;

/// Port for the demo HTTP listener
/// Default: 3001
pub(crate) static DEMO_PORT: LazyLock<u16> = LazyLock::new(|| {
    std::env::var("DEMO_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3001)
});

pub(crate) const SESSION_GC_INTERVAL: Duration = Duration::from_secs(60);
