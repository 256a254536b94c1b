use crate::Environment;
use opentelemetry::KeyValue;
use opentelemetry::global;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    metrics::{PeriodicReader, SdkMeterProvider},
    propagation::TraceContextPropagator,
    trace::{Sampler, SdkTracerProvider},
};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const METRIC_EXPORT_INTERVAL: Duration = Duration::from_secs(10);

/// Wires tracing spans and metrics to an OTLP collector.
///
/// Holds the SDK providers so pending export batches are flushed when the
/// guard goes out of scope at shutdown. Init also installs the global
/// tracing subscriber, so a process uses either this or
/// [`crate::logging::setup_logging`], not both.
pub struct TelemetryGuard {
    tracer_provider: SdkTracerProvider,
    meter_provider: SdkMeterProvider,
}

impl TelemetryGuard {
    /// Set up OTLP export for `service_name` against `endpoint`
    /// (e.g. "http://localhost:4317"). Log formatting follows `environment`:
    /// JSON in production, human-readable otherwise.
    pub fn init(
        service_name: &str,
        endpoint: &str,
        environment: Environment,
    ) -> anyhow::Result<Self> {
        global::set_text_map_propagator(TraceContextPropagator::new());

        let resource = Resource::builder()
            .with_attributes([
                KeyValue::new(
                    opentelemetry_semantic_conventions::attribute::SERVICE_NAME,
                    service_name.to_string(),
                ),
                KeyValue::new(
                    opentelemetry_semantic_conventions::attribute::SERVICE_VERSION,
                    env!("CARGO_PKG_VERSION"),
                ),
            ])
            .build();

        let trace_exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()?;

        let tracer_provider = SdkTracerProvider::builder()
            .with_resource(resource.clone())
            .with_sampler(Sampler::ParentBased(Box::new(Sampler::AlwaysOn)))
            .with_batch_exporter(trace_exporter)
            .build();

        global::set_tracer_provider(tracer_provider.clone());

        let metric_exporter = opentelemetry_otlp::MetricExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()?;

        let metric_reader = PeriodicReader::builder(metric_exporter)
            .with_interval(METRIC_EXPORT_INTERVAL)
            .build();

        let meter_provider = SdkMeterProvider::builder()
            .with_resource(resource)
            .with_reader(metric_reader)
            .build();

        global::set_meter_provider(meter_provider.clone());

        let otel_layer =
            tracing_opentelemetry::layer().with_tracer(global::tracer(service_name.to_string()));

        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

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

        Ok(Self {
            tracer_provider,
            meter_provider,
        })
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        // The subscriber may already be torn down here, so report to stderr
        // directly rather than through tracing.
        if let Err(e) = self.tracer_provider.shutdown() {
            eprintln!("telemetry: tracer provider shutdown failed: {e:?}");
        }
        if let Err(e) = self.meter_provider.shutdown() {
            eprintln!("telemetry: meter provider shutdown failed: {e:?}");
        }
    }
}

/// Creates an info-level span and enters it.
#[macro_export]
macro_rules! span {
    ($name:literal) => {
        tracing::info_span!($name).entered()
    };
}
