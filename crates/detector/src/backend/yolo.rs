use crate::error::DetectorError;
use mapper::RawDetection;

/// Letterbox transform from network-input coordinates back into the target
/// pixel frame the image was prepared in.
pub struct FrameTransform {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub frame_width: f32,
    pub frame_height: f32,
}

/// Decode YOLO-style predictions of shape `[1, N, 5 + num_classes]`:
/// cxcywh in input pixels, objectness, then per-class scores.
///
/// Confidence is `objectness * best_class_score`; rows below `threshold` are
/// skipped. Box centers are mapped back through the inverse letterbox
/// transform and clamped to the target frame, widths and heights are only
/// rescaled. Emission order follows the network's row order.
pub fn decode_predictions(
    predictions: &ndarray::ArrayViewD<f32>,
    labels: &[String],
    threshold: f32,
    transform: &FrameTransform,
) -> Result<Vec<RawDetection>, DetectorError> {
    let shape = predictions.shape();
    if shape.len() != 3 || shape[2] < 6 {
        return Err(DetectorError::InferenceError(format!(
            "unexpected prediction shape {shape:?}, want [1, rows, 5 + classes]"
        )));
    }

    let rows = shape[1];
    let num_classes = shape[2] - 5;
    let mut detections = Vec::new();

    for i in 0..rows {
        let objectness = predictions[[0, i, 4]];

        // Argmax over class scores
        let mut best_score = f32::NEG_INFINITY;
        let mut best_class = 0usize;
        for c in 0..num_classes {
            let score = predictions[[0, i, 5 + c]];
            if score > best_score {
                best_score = score;
                best_class = c;
            }
        }

        let confidence = objectness * best_score;
        if confidence < threshold {
            continue;
        }

        let center_x = ((predictions[[0, i, 0]] - transform.offset_x) / transform.scale)
            .max(0.0)
            .min(transform.frame_width);
        let center_y = ((predictions[[0, i, 1]] - transform.offset_y) / transform.scale)
            .max(0.0)
            .min(transform.frame_height);
        let width = predictions[[0, i, 2]] / transform.scale;
        let height = predictions[[0, i, 3]] / transform.scale;

        let label = labels
            .get(best_class)
            .cloned()
            .unwrap_or_else(|| format!("class_{best_class}"));

        detections.push(RawDetection::new(
            label, confidence, center_x, center_y, width, height,
        ));
    }

    Ok(detections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array, IxDyn};

    fn identity_transform(frame: f32) -> FrameTransform {
        FrameTransform {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            frame_width: frame,
            frame_height: frame,
        }
    }

    fn test_labels() -> Vec<String> {
        vec!["person".to_string(), "apple".to_string(), "cup".to_string()]
    }

    /// Rows are (cx, cy, w, h, objectness, class scores...)
    fn predictions(rows: Vec<[f32; 8]>) -> Array<f32, IxDyn> {
        let n = rows.len();
        let data: Vec<f32> = rows.into_iter().flatten().collect();
        Array::from_shape_vec(IxDyn(&[1, n, 8]), data).unwrap()
    }

    #[test]
    fn threshold_filters_low_confidence_rows() {
        let preds = predictions(vec![
            // objectness 0.9 * best score 0.8 = 0.72, kept
            [100.0, 100.0, 50.0, 50.0, 0.9, 0.1, 0.8, 0.1],
            // objectness 0.3 * best score 0.5 = 0.15, dropped
            [200.0, 200.0, 50.0, 50.0, 0.3, 0.5, 0.2, 0.1],
        ]);

        let dets =
            decode_predictions(&preds.view(), &test_labels(), 0.25, &identity_transform(640.0))
                .unwrap();

        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].label, "apple");
        assert!((dets[0].confidence - 0.72).abs() < 1e-6);
    }

    #[test]
    fn inverse_letterbox_maps_back_to_frame() {
        // Frame 950x950 letterboxed into 640x640: scale = 640/950, no offset
        // on either axis for a square frame.
        let scale = 640.0 / 950.0;
        let transform = FrameTransform {
            scale,
            offset_x: 0.0,
            offset_y: 0.0,
            frame_width: 950.0,
            frame_height: 950.0,
        };

        // Center of the input maps to the center of the frame
        let preds = predictions(vec![[320.0, 320.0, 64.0, 64.0, 1.0, 0.0, 0.9, 0.0]]);
        let dets = decode_predictions(&preds.view(), &test_labels(), 0.25, &transform).unwrap();

        assert_eq!(dets.len(), 1);
        assert!((dets[0].center_x - 475.0).abs() < 0.1, "got {}", dets[0].center_x);
        assert!((dets[0].center_y - 475.0).abs() < 0.1);
        assert!((dets[0].width - 64.0 / scale).abs() < 0.1);
    }

    #[test]
    fn centers_are_clamped_to_the_frame() {
        let transform = FrameTransform {
            scale: 1.0,
            offset_x: 50.0,
            offset_y: 50.0,
            frame_width: 400.0,
            frame_height: 400.0,
        };

        let preds = predictions(vec![
            // lands at -40 before clamping
            [10.0, 10.0, 20.0, 20.0, 1.0, 0.9, 0.0, 0.0],
            // lands at 550 before clamping
            [600.0, 600.0, 20.0, 20.0, 1.0, 0.9, 0.0, 0.0],
        ]);
        let dets = decode_predictions(&preds.view(), &test_labels(), 0.25, &transform).unwrap();

        assert_eq!(dets[0].center_x, 0.0);
        assert_eq!(dets[0].center_y, 0.0);
        assert_eq!(dets[1].center_x, 400.0);
        assert_eq!(dets[1].center_y, 400.0);
    }

    #[test]
    fn unknown_class_index_gets_placeholder_label() {
        let labels = vec!["person".to_string()];
        let preds = predictions(vec![[100.0, 100.0, 50.0, 50.0, 1.0, 0.0, 0.0, 0.9]]);
        let dets =
            decode_predictions(&preds.view(), &labels, 0.25, &identity_transform(640.0)).unwrap();
        assert_eq!(dets[0].label, "class_2");
    }

    #[test]
    fn malformed_shape_is_an_inference_error() {
        let preds = Array::from_shape_vec(IxDyn(&[1, 4]), vec![0.0; 4]).unwrap();
        let err = decode_predictions(
            &preds.view(),
            &test_labels(),
            0.25,
            &identity_transform(640.0),
        )
        .unwrap_err();
        assert!(matches!(err, DetectorError::InferenceError(_)));
    }

    #[test]
    fn empty_predictions_decode_to_empty() {
        let preds = Array::from_shape_vec(IxDyn(&[1, 0, 8]), vec![]).unwrap();
        let dets =
            decode_predictions(&preds.view(), &test_labels(), 0.25, &identity_transform(640.0))
                .unwrap();
        assert!(dets.is_empty());
    }
}
