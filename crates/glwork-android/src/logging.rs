//! Logging setup: logcat on Android, stderr elsewhere.

/// Logcat tag for every event emitted through `tracing`.
pub const LOG_TAG: &str = "glwork";

#[cfg(target_os = "android")]
pub fn init() {
    use std::sync::Once;

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    static LOG_INIT_ONCE: Once = Once::new();

    LOG_INIT_ONCE.call_once(|| match tracing_android::layer(LOG_TAG) {
        Ok(layer) => {
            if tracing_subscriber::registry()
                .with(glwork_core::logging::env_filter())
                .with(layer)
                .try_init()
                .is_ok()
            {
                tracing::debug!("logcat logging initialised");
            }
        }
        Err(err) => eprintln!("glwork: cannot open logcat: {err}"),
    });
}

#[cfg(not(target_os = "android"))]
pub fn init() {
    glwork_core::logging::init();
}
