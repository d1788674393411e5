use std::sync::Once;

use crate::config::BridgeConfig;

static LOGGING_INIT: Once = Once::new();

/// Initialize logging exactly once per process.
///
/// On Android, `tracing` events reach logcat through the `log` facade and
/// `android_logger`. Elsewhere a `tracing-subscriber` formatter writes to
/// stderr, filtered by `RUST_LOG` or the configured default.
pub fn init(config: &BridgeConfig) {
    LOGGING_INIT.call_once(|| {
        #[cfg(target_os = "android")]
        {
            android_logger::init_once(
                android_logger::Config::default()
                    .with_max_level(log::LevelFilter::Debug)
                    .with_tag(config.log_tag.as_str()),
            );
        }

        #[cfg(not(target_os = "android"))]
        {
            use tracing_subscriber::EnvFilter;

            let filter = EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.log_filter))
                .unwrap_or_else(|_| EnvFilter::new("info"));

            // Another subscriber may already be installed by the host.
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .try_init();
        }

        tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            util_package = %config.util_package,
            "session-jni logging initialised"
        );
    });
}
