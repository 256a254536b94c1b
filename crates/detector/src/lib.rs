pub mod backend;
pub mod error;
pub mod frame;
pub mod labels;

pub use backend::DetectorBackend;
pub use error::DetectorError;
