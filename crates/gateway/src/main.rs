use common::{TelemetryGuard, setup_logging};
use detector::backend::ort::{ExecutionProvider, YoloOrtBackend};
use gateway::{
    config::get_configuration,
    metrics::Metrics,
    routes::router,
    state::AppState,
};
use std::sync::Arc;

const SERVICE_NAME: &str = "itemscan-gateway";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = get_configuration()?;

    // TelemetryGuard installs the subscriber itself when exporting is on.
    let _telemetry = match settings.otlp_endpoint.as_deref() {
        Some(endpoint) => Some(TelemetryGuard::init(
            SERVICE_NAME,
            endpoint,
            settings.environment,
        )?),
        None => {
            setup_logging(settings.environment);
            None
        }
    };

    let mapping = settings.mapping_config()?;

    tracing::info!(
        model_path = %settings.model_path,
        target_width = settings.target_width,
        target_height = settings.target_height,
        "Loading detection backend"
    );

    let provider = match settings.execution_provider.to_lowercase().as_str() {
        "cuda" => ExecutionProvider::Cuda,
        _ => ExecutionProvider::Cpu,
    };

    let backend = YoloOrtBackend::load(
        &settings.model_path,
        &settings.labels_path,
        (settings.input_size, settings.input_size),
        provider,
    )?;

    let state = AppState {
        backend: Arc::new(backend),
        mapping,
        confidence_threshold: settings.confidence_threshold,
        metrics: Metrics::new("gateway"),
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&settings.listen_addr).await?;
    tracing::info!(addr = %settings.listen_addr, "Gateway listening");

    axum::serve(listener, app).await?;

    Ok(())
}
