use crate::error::DetectorError;
use std::fs;

/// Load class names from a labels file, one name per line (coco.names style).
/// Blank lines and surrounding whitespace are ignored.
pub fn load_labels(path: &str) -> Result<Vec<String>, DetectorError> {
    let raw = fs::read_to_string(path).map_err(|e| {
        DetectorError::ModelUnavailable(format!("failed to read labels file {path}: {e}"))
    })?;

    let labels: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    if labels.is_empty() {
        return Err(DetectorError::ModelUnavailable(format!(
            "labels file {path} contains no class names"
        )));
    }

    Ok(labels)
}
