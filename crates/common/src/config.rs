use serde::Deserialize;

/// Deployment environment, set through the service configuration
/// (`ITEMSCAN_ENVIRONMENT`). Selects log formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}
