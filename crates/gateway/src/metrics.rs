use opentelemetry::global;
use opentelemetry::metrics::{Counter, Histogram, Meter};

/// Request-level metrics, registered once at startup.
#[derive(Clone)]
pub struct Metrics {
    pub request_duration: Histogram<f64>,
    pub requests_total: Counter<u64>,
    pub detections_total: Counter<u64>,
}

impl Metrics {
    pub fn new(meter_name: &'static str) -> Self {
        Self::from_meter(global::meter(meter_name))
    }

    /// Register against an explicit meter; lets tests supply their own
    /// provider instead of the global one.
    pub fn from_meter(meter: Meter) -> Self {
        let latency_buckets = [
            0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.15, 0.2, 0.3, 0.5, 0.75, 1.0, 2.0, 5.0,
        ];

        let request_duration: Histogram<f64> = meter
            .f64_histogram("detect_request_duration_seconds")
            .with_description("Time to serve one detection request (decode + infer + map)")
            .with_unit("s")
            .with_boundaries(latency_buckets.to_vec())
            .build();
        let requests_total: Counter<u64> = meter
            .u64_counter("detect_requests_total")
            .with_description("Total detection requests served")
            .build();
        let detections_total: Counter<u64> = meter
            .u64_counter("detect_detections_total")
            .with_description("Total mapped detections returned")
            .build();

        Self {
            request_duration,
            requests_total,
            detections_total,
        }
    }
}
