use super::DetectorBackend;
use crate::backend::yolo::{self, FrameTransform};
use crate::error::DetectorError;
use crate::frame;
use crate::labels;
use image::RgbImage;
use mapper::RawDetection;
use ort::{
    session::{Session, builder::GraphOptimizationLevel},
    value::TensorRef,
};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy)]
pub enum ExecutionProvider {
    Cpu,
    Cuda,
}

/// YOLO-family network loaded through ONNX Runtime.
///
/// The session is created once at startup and shared behind a lock; ORT
/// requires exclusive access per run.
pub struct YoloOrtBackend {
    session: Mutex<Session>,
    labels: Vec<String>,
    input_size: (u32, u32),
}

impl YoloOrtBackend {
    pub fn load(
        model_path: &str,
        labels_path: &str,
        input_size: (u32, u32),
        provider: ExecutionProvider,
    ) -> Result<Self, DetectorError> {
        let labels = labels::load_labels(labels_path)?;

        // Initialize ORT environment (idempotent)
        let _ = ort::init().commit();

        let mut builder = Session::builder()
            .map_err(unavailable)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(unavailable)?
            .with_intra_threads(4)
            .map_err(unavailable)?;

        match provider {
            ExecutionProvider::Cuda => {
                #[cfg(feature = "cuda")]
                {
                    tracing::info!("Initializing ONNX Runtime with CUDA execution provider");
                    builder = builder
                        .with_execution_providers([
                            ort::execution_providers::CUDAExecutionProvider::default()
                                .with_device_id(0)
                                .build()
                                .error_on_failure(),
                        ])
                        .map_err(unavailable)?;
                }
                #[cfg(not(feature = "cuda"))]
                {
                    return Err(DetectorError::ModelUnavailable(
                        "CUDA execution provider requested but the `cuda` feature is not enabled"
                            .to_string(),
                    ));
                }
            }
            ExecutionProvider::Cpu => {
                tracing::info!("Initializing ONNX Runtime with CPU execution provider");
            }
        }

        let session = builder.commit_from_file(model_path).map_err(unavailable)?;

        tracing::info!(
            model_path,
            classes = labels.len(),
            input_width = input_size.0,
            input_height = input_size.1,
            "Model loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            labels,
            input_size,
        })
    }
}

impl DetectorBackend for YoloOrtBackend {
    fn detect(
        &self,
        frame: &RgbImage,
        threshold: f32,
    ) -> Result<Vec<RawDetection>, DetectorError> {
        let input = frame::letterbox_to_input(frame, self.input_size)?;

        let (frame_width, frame_height) = frame.dimensions();
        let transform = FrameTransform {
            scale: input.scale,
            offset_x: input.offset_x,
            offset_y: input.offset_y,
            frame_width: frame_width as f32,
            frame_height: frame_height as f32,
        };

        let mut session = self
            .session
            .lock()
            .map_err(|_| DetectorError::InferenceError("model session lock poisoned".to_string()))?;

        let tensor = TensorRef::from_array_view(input.tensor.view()).map_err(inference)?;
        let outputs = session
            .run(ort::inputs!["images" => tensor])
            .map_err(inference)?;

        let (_, value) = outputs.iter().next().ok_or_else(|| {
            DetectorError::InferenceError("model produced no outputs".to_string())
        })?;
        let predictions = value.try_extract_array::<f32>().map_err(inference)?;

        yolo::decode_predictions(&predictions, &self.labels, threshold, &transform)
    }
}

fn unavailable(e: ort::Error) -> DetectorError {
    DetectorError::ModelUnavailable(e.to_string())
}

fn inference(e: ort::Error) -> DetectorError {
    DetectorError::InferenceError(e.to_string())
}
