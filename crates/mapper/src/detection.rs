use serde::Serialize;

/// One predicted object instance as emitted by a detection backend, with the
/// bounding box in center form and coordinates in the target pixel frame
/// (origin top-left, x right, y down).
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    pub label: String,
    pub confidence: f32,
    pub center_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
}

impl RawDetection {
    pub fn new(
        label: impl Into<String>,
        confidence: f32,
        center_x: f32,
        center_y: f32,
        width: f32,
        height: f32,
    ) -> Self {
        Self {
            label: label.into(),
            confidence,
            center_x,
            center_y,
            width,
            height,
        }
    }

    /// Darknet-style bindings hand class labels back as raw bytes; decode them
    /// as UTF-8 up front so downstream code only ever sees text.
    pub fn with_byte_label(
        label: &[u8],
        confidence: f32,
        center_x: f32,
        center_y: f32,
        width: f32,
        height: f32,
    ) -> Self {
        Self::new(
            String::from_utf8_lossy(label),
            confidence,
            center_x,
            center_y,
            width,
            height,
        )
    }

    /// Bounding-box area in raw pixel units.
    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// Corner-form bounding box, truncated toward zero to integer pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CornerBox {
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

impl CornerBox {
    pub fn from_center(center_x: f32, center_y: f32, width: f32, height: f32) -> Self {
        Self {
            xmin: (center_x - width / 2.0) as i32,
            ymin: (center_y - height / 2.0) as i32,
            xmax: (center_x + width / 2.0) as i32,
            ymax: (center_y + height / 2.0) as i32,
        }
    }
}

/// A detection after area filtering, bottom-right-origin remap, and
/// pixel-to-centimeter scaling.
#[derive(Debug, Clone, Serialize)]
pub struct MappedDetection {
    pub class: String,
    pub confidence: f32,
    pub x_cm: f32,
    pub y_cm: f32,
    pub surface_cm2: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<CornerBox>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_label_decodes_like_text_label() {
        let from_bytes = RawDetection::with_byte_label(b"apple", 0.9, 100.0, 200.0, 50.0, 60.0);
        let from_text = RawDetection::new("apple", 0.9, 100.0, 200.0, 50.0, 60.0);
        assert_eq!(from_bytes, from_text);
    }

    #[test]
    fn invalid_utf8_label_is_replaced_not_rejected() {
        let det = RawDetection::with_byte_label(&[0x61, 0xFF, 0x62], 0.5, 0.0, 0.0, 1.0, 1.0);
        assert_eq!(det.label, "a\u{FFFD}b");
    }

    #[test]
    fn corner_box_truncates_toward_zero() {
        // center (100, 200), 50x60 box: corners at (75, 170) / (125, 230)
        let bbox = CornerBox::from_center(100.0, 200.0, 50.0, 60.0);
        assert_eq!(
            bbox,
            CornerBox {
                xmin: 75,
                ymin: 170,
                xmax: 125,
                ymax: 230
            }
        );

        // fractional corners truncate, they do not round
        let bbox = CornerBox::from_center(10.0, 10.0, 5.0, 5.0);
        assert_eq!(bbox.xmin, 7); // 7.5 -> 7
        assert_eq!(bbox.xmax, 12); // 12.5 -> 12
    }

    #[test]
    fn area_of_degenerate_box_is_non_positive() {
        let det = RawDetection::new("noise", 0.4, 10.0, 10.0, -5.0, 8.0);
        assert!(det.area() <= 0.0);
    }

    #[test]
    fn bbox_is_omitted_from_json_when_absent() {
        let mapped = MappedDetection {
            class: "apple".to_string(),
            confidence: 0.877,
            x_cm: 25.08,
            y_cm: 22.13,
            surface_cm2: 8.7,
            bbox: None,
        };
        let json = serde_json::to_value(&mapped).unwrap();
        assert!(json.get("bbox").is_none());
        assert_eq!(json["class"], "apple");
    }

    #[test]
    fn bbox_serializes_in_corner_form() {
        let mapped = MappedDetection {
            class: "apple".to_string(),
            confidence: 0.877,
            x_cm: 25.08,
            y_cm: 22.13,
            surface_cm2: 8.7,
            bbox: Some(CornerBox {
                xmin: 50,
                ymin: 150,
                xmax: 150,
                ymax: 250,
            }),
        };
        let json = serde_json::to_value(&mapped).unwrap();
        assert_eq!(json["bbox"]["xmin"], 50);
        assert_eq!(json["bbox"]["ymax"], 250);
    }
}
