use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::{get, post},
};
use detector::frame;
use mapper::MappedDetection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use tower_http::cors::CorsLayer;

#[derive(Serialize)]
pub struct DetectResponse {
    pub detections: usize,
    pub item_positions: Vec<MappedDetection>,
}

#[derive(Deserialize)]
pub struct PathRequest {
    pub path: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/detect", post(detect_upload))
        .route("/detect/path", post(detect_path))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "model": "ready" }))
}

/// Multipart upload: the image arrives in a `file` field, like the original
/// form-based clients send it.
async fn detect_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<DetectResponse>, ApiError> {
    let mut image_data = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;
            image_data = Some(data.to_vec());
        }
    }

    let image_data =
        image_data.ok_or_else(|| ApiError::BadRequest("missing `file` field".to_string()))?;

    run_detection(state, image_data).await
}

/// Server-side path variant: detect on an image already on disk.
async fn detect_path(
    State(state): State<AppState>,
    Json(request): Json<PathRequest>,
) -> Result<Json<DetectResponse>, ApiError> {
    let image_data = tokio::fs::read(&request.path)
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read {}: {e}", request.path)))?;

    run_detection(state, image_data).await
}

/// Decode, resize to the target frame, run the backend, and map the output.
/// Inference is CPU-bound, so the whole pipeline runs on a blocking thread.
#[tracing::instrument(skip_all, fields(bytes = image_data.len()))]
async fn run_detection(
    state: AppState,
    image_data: Vec<u8>,
) -> Result<Json<DetectResponse>, ApiError> {
    let start = Instant::now();

    let pipeline_state = state.clone();
    let result = tokio::task::spawn_blocking(move || {
        let frame = frame::prepare_frame(
            &image_data,
            pipeline_state.mapping.target_width as u32,
            pipeline_state.mapping.target_height as u32,
        )?;
        let raw = pipeline_state
            .backend
            .detect(&frame, pipeline_state.confidence_threshold)?;
        Ok::<_, detector::DetectorError>(mapper::map(&raw, &pipeline_state.mapping))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("detection task failed: {e}")))
    .and_then(|pipeline| pipeline.map_err(ApiError::from));

    // Count the request and its latency whether or not the pipeline
    // succeeded; only the detection count is success-only.
    state.metrics.requests_total.add(1, &[]);
    state
        .metrics
        .request_duration
        .record(start.elapsed().as_secs_f64(), &[]);

    let item_positions = result?;
    state
        .metrics
        .detections_total
        .add(item_positions.len() as u64, &[]);

    tracing::debug!(
        detections = item_positions.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Detection request served"
    );

    Ok(Json(DetectResponse {
        detections: item_positions.len(),
        item_positions,
    }))
}
