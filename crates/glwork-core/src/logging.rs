//! Process-wide `tracing` setup.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `GLWORK_LOG=glwork_gl=trace`.
pub const LOG_ENV: &str = "GLWORK_LOG";

static LOG_INIT_ONCE: Once = Once::new();

/// Filter from `GLWORK_LOG`, then `RUST_LOG`, then `info`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a formatting subscriber once per process.
///
/// See [`env_filter`]. If the host already installed a global subscriber it
/// is left alone.
pub fn init() {
    LOG_INIT_ONCE.call_once(|| {
        if tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_target(true)
            .try_init()
            .is_ok()
        {
            tracing::debug!("logging initialised");
        }
    });
}
