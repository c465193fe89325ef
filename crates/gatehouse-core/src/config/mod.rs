//! Configuration model for gatehouse
//!
//! A single TOML file declares the logging level and the repositories the
//! configuration-backed collaborators serve.

pub mod gate;
pub mod traits;

pub use gate::{ConfigError, GateConfig, LoggingConfig, RepositoryEntry, Visibility};
pub use traits::ConfigValidation;
