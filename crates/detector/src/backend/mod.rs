use crate::error::DetectorError;
use image::RgbImage;
use mapper::RawDetection;

pub mod yolo;

#[cfg(feature = "ort-backend")]
pub mod ort;

/// A loaded object-detection network.
///
/// Implementations hold the weights for the whole process lifetime and are
/// shared read-only across requests; `detect` takes `&self` so one instance
/// can serve concurrent callers. The image must already be resized to the
/// target frame the coordinate mapping is configured for.
pub trait DetectorBackend: Send + Sync {
    fn detect(&self, frame: &RgbImage, threshold: f32)
    -> Result<Vec<RawDetection>, DetectorError>;
}
