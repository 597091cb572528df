//! Process-wide tracing setup. Initialized exactly once at startup; the
//! returned guard's drop is the defined shutdown step.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Held by `main` for the lifetime of the process. Dropping it marks
/// shutdown in the log stream before the subscriber goes away with the
/// process.
pub struct TelemetryGuard;

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Telemetry shutting down");
    }
}

/// Installs the global subscriber. `RUST_LOG` wins when set; otherwise the
/// configured default level applies to this crate only.
pub fn init(default_level: &str) -> TelemetryGuard {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("portfolio_api={default_level}"))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    TelemetryGuard
}
