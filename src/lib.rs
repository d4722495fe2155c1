pub mod config;
pub mod domain;
pub mod error;
pub mod state;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Installs a stdout tracing subscriber. The hosting process owns the
/// subscriber lifecycle; calling this twice panics, so embedders that bring
/// their own subscriber should simply not call it.
pub fn init_logging() {
    let stdout_layer = tracing_subscriber::fmt::layer()
        .pretty()
        .with_target(false)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()));

    tracing_subscriber::registry().with(stdout_layer).init();
}
