use crate::config::Environment;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with pretty formatting for development
/// and JSON formatting for production.
///
/// Uses the RUST_LOG environment variable for filtering (defaults to "info").
///
/// An OpenTelemetry layer is attached so spans are exported whenever a global
/// tracer provider has been installed (see [`crate::telemetry::TelemetryGuard`]).
pub fn setup_logging(environment: Environment) {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let otel_layer = tracing_opentelemetry::layer();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(otel_layer);

    if environment.is_production() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_level(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().pretty().with_ansi(true))
            .init();
    }
}
