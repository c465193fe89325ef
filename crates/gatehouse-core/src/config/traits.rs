//! Core configuration traits

use super::gate::ConfigError;

/// Trait for configuration validation
pub trait ConfigValidation {
    /// Validate this configuration
    fn validate(&self) -> Result<(), ConfigError>;
}
