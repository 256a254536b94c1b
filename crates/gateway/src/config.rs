use common::Environment;
use mapper::{MapperError, MappingConfig};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Settings {
    pub environment: Environment,
    pub listen_addr: String,
    /// OTLP collector endpoint; telemetry export is off when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    pub model_path: String,
    pub labels_path: String,
    /// `cpu` or `cuda`; CUDA additionally needs the detector crate's `cuda`
    /// feature at build time.
    pub execution_provider: String,
    /// Square network input edge in pixels.
    pub input_size: u32,
    pub confidence_threshold: f32,
    /// Fixed detection frame; uploads are resized to exactly this size
    /// before inference so pixel positions line up with the mapping.
    pub target_width: u32,
    pub target_height: u32,
    pub pixel_to_cm: f32,
    pub min_area: f32,
    pub max_area: f32,
    pub include_bbox: bool,
}

impl Settings {
    pub fn mapping_config(&self) -> Result<MappingConfig, MapperError> {
        MappingConfig::new(
            self.target_width as f32,
            self.target_height as f32,
            self.pixel_to_cm,
            self.min_area,
            self.max_area,
            self.include_bbox,
        )
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let config = base_configuration()?
        .add_source(
            config::Environment::with_prefix("ITEMSCAN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings: Settings = config.try_deserialize::<Settings>()?;

    Ok(settings)
}

fn base_configuration()
-> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("environment", "development")?
        .set_default("listen_addr", "0.0.0.0:8000")?
        .set_default("model_path", "./models/yolov5s.onnx")?
        .set_default("labels_path", "./models/coco.names")?
        .set_default("execution_provider", "cpu")?
        .set_default("input_size", 640)?
        .set_default("confidence_threshold", 0.25)?
        .set_default("target_width", 950)?
        .set_default("target_height", 950)?
        .set_default("pixel_to_cm", 0.0295)?
        .set_default("min_area", 5000.0)?
        .set_default("max_area", 1_000_000.0)?
        .set_default("include_bbox", true)
}
