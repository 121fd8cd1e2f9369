// src/utils/log_utils.rs
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// An explicit `filter` (usually `logging.filter` from settings) wins over
/// `RUST_LOG`; with neither set, only warnings and errors are shown. Returns
/// `false` when a subscriber was already installed, which is not an error.
pub fn init_logging(filter: Option<&str>) -> bool {
    let env_filter = match filter {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
