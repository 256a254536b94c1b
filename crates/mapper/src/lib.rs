pub mod config;
pub mod detection;
pub mod mapping;

pub use config::{MapperError, MappingConfig};
pub use detection::{CornerBox, MappedDetection, RawDetection};
pub use mapping::map;
