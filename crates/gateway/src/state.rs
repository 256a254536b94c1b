use crate::metrics::Metrics;
use detector::DetectorBackend;
use mapper::MappingConfig;
use std::sync::Arc;

/// Shared per-process state: the backend is loaded once at startup and
/// treated as read-only afterwards, the mapping config is immutable.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn DetectorBackend>,
    pub mapping: MappingConfig,
    pub confidence_threshold: f32,
    pub metrics: Metrics,
}
