use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum MapperError {
    #[error("invalid mapping config: {0}")]
    InvalidConfig(String),
}

/// Fixed per-deployment parameters of the coordinate mapping.
///
/// `target_width`/`target_height` describe the pixel frame the raw detections
/// are expressed in; the image must be resized to exactly that frame before
/// detection. `min_area`/`max_area` bound the accepted bounding-box area in
/// raw pixel units.
#[derive(Debug, Clone, Copy)]
pub struct MappingConfig {
    pub target_width: f32,
    pub target_height: f32,
    pub pixel_to_cm: f32,
    pub min_area: f32,
    pub max_area: f32,
    /// Include the corner-form bounding box in each mapped detection.
    pub include_bbox: bool,
}

impl MappingConfig {
    pub fn new(
        target_width: f32,
        target_height: f32,
        pixel_to_cm: f32,
        min_area: f32,
        max_area: f32,
        include_bbox: bool,
    ) -> Result<Self, MapperError> {
        let config = Self {
            target_width,
            target_height,
            pixel_to_cm,
            min_area,
            max_area,
            include_bbox,
        };
        config.validate()?;
        Ok(config)
    }

    /// Deployment-time sanity check. Runs before any detection is processed;
    /// `map` itself never fails.
    pub fn validate(&self) -> Result<(), MapperError> {
        if self.pixel_to_cm <= 0.0 {
            return Err(MapperError::InvalidConfig(format!(
                "pixel_to_cm must be positive, got {}",
                self.pixel_to_cm
            )));
        }
        if self.target_width <= 0.0 || self.target_height <= 0.0 {
            return Err(MapperError::InvalidConfig(format!(
                "target frame must be positive, got {}x{}",
                self.target_width, self.target_height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config_passes() {
        let config = MappingConfig::new(950.0, 950.0, 0.0295, 5000.0, 1_000_000.0, true);
        assert!(config.is_ok());
    }

    #[test]
    fn non_positive_scale_is_rejected() {
        let err = MappingConfig::new(950.0, 950.0, 0.0, 5000.0, 1_000_000.0, true).unwrap_err();
        assert!(
            err.to_string().contains("pixel_to_cm"),
            "error should name the bad field: {err}"
        );

        let err = MappingConfig::new(950.0, 950.0, -0.1, 5000.0, 1_000_000.0, true).unwrap_err();
        assert!(err.to_string().contains("pixel_to_cm"));
    }

    #[test]
    fn non_positive_frame_is_rejected() {
        let err = MappingConfig::new(0.0, 950.0, 0.0295, 5000.0, 1_000_000.0, true).unwrap_err();
        assert!(err.to_string().contains("target frame"));

        let err = MappingConfig::new(950.0, -1.0, 0.0295, 5000.0, 1_000_000.0, true).unwrap_err();
        assert!(err.to_string().contains("target frame"));
    }

    #[test]
    fn error_display_formatting() {
        let err = MapperError::InvalidConfig("pixel_to_cm must be positive, got 0".to_string());
        assert_eq!(
            err.to_string(),
            "invalid mapping config: pixel_to_cm must be positive, got 0"
        );
    }
}
