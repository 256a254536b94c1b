use crate::config::MappingConfig;
use crate::detection::{CornerBox, MappedDetection, RawDetection};

/// Map raw detections into filtered, unit-scaled positions on the target
/// surface.
///
/// Pure function: no I/O, no shared state, safe to call concurrently. Output
/// order matches input order; detections whose pixel area falls outside
/// `[min_area, max_area]` are dropped. The config is assumed validated (see
/// [`MappingConfig::validate`]), so this never fails.
pub fn map(detections: &[RawDetection], config: &MappingConfig) -> Vec<MappedDetection> {
    detections
        .iter()
        .filter_map(|det| map_one(det, config))
        .collect()
}

fn map_one(det: &RawDetection, config: &MappingConfig) -> Option<MappedDetection> {
    // Area filter in raw pixel space. A malformed detection with negative
    // width or height lands below min_area and is dropped here rather than
    // failing the whole batch.
    let area = f64::from(det.width) * f64::from(det.height);
    if area < f64::from(config.min_area) || area > f64::from(config.max_area) {
        return None;
    }

    let bbox = config
        .include_bbox
        .then(|| CornerBox::from_center(det.center_x, det.center_y, det.width, det.height));

    // Remap to a bottom-right origin of the target frame. The raw coordinates
    // must already be expressed in that frame; the caller resizes the image to
    // target_width x target_height before detection.
    let x_br = f64::from(config.target_width) - f64::from(det.center_x);
    let y_br = f64::from(config.target_height) - f64::from(det.center_y);

    let pixel_to_cm = f64::from(config.pixel_to_cm);

    Some(MappedDetection {
        class: det.label.clone(),
        confidence: round_to(f64::from(det.confidence), 3) as f32,
        x_cm: round_to(x_br * pixel_to_cm, 2) as f32,
        y_cm: round_to(y_br * pixel_to_cm, 2) as f32,
        surface_cm2: round_to(area * pixel_to_cm * pixel_to_cm, 2) as f32,
        bbox,
    })
}

/// Round half away from zero to the given number of decimal places.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
