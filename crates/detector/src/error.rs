use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectorError {
    /// Network weights or labels could not be loaded. Startup-time failure;
    /// never retried per request.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// The submitted image could not be decoded into a pixel buffer.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The backend failed while running the loaded network.
    #[error("inference failed: {0}")]
    InferenceError(String),
}
