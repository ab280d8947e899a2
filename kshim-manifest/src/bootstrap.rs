//! Process setup shared by the manifest binary and its tests.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing with the KSHIM_LOG environment variable.
///
/// Defaults to "info" level if KSHIM_LOG is not set. Logs go to stderr so
/// stdout carries only the rendered manifest.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("KSHIM_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
