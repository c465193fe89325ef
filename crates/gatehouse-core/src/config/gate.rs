//! Gatehouse configuration file

use super::traits::ConfigValidation;
use crate::types::{Callsign, RepositoryRecord, ServeMode, VcsKind, ViewerId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        /// File that failed to load
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The file parsed but violates a configuration invariant
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Repositories known to the directory
    #[serde(default, rename = "repository")]
    pub repositories: Vec<RepositoryEntry>,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter directive, e.g. `warn` or `gatehouse_workflow=debug`
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_owned()
}

/// Who may see a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Every authenticated viewer
    #[default]
    Public,
    /// Only listed members and pushers
    Members,
}

/// One configured repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryEntry {
    /// Unique callsign
    pub callsign: Callsign,
    /// Human-readable name; defaults to the callsign
    #[serde(default)]
    pub name: Option<String>,
    /// Version control system
    #[serde(default)]
    pub vcs: VcsKind,
    /// Serve setting: `off`, `readonly` or `readwrite`
    #[serde(default = "default_serve_setting")]
    pub serve_over_ssh: String,
    /// On-disk location served by the data plane
    #[serde(default)]
    pub local_path: Option<PathBuf>,
    /// Visibility policy
    #[serde(default)]
    pub visibility: Visibility,
    /// Viewers who may see a members-only repository
    #[serde(default)]
    pub members: Vec<ViewerId>,
    /// Viewers granted `repository.push`
    #[serde(default)]
    pub pushers: Vec<ViewerId>,
}

fn default_serve_setting() -> String {
    ServeMode::SETTING_OFF.to_owned()
}

impl RepositoryEntry {
    /// Build the record the directory hands to sessions
    pub fn to_record(&self) -> RepositoryRecord {
        let record = RepositoryRecord::new(self.callsign.clone(), self.vcs, &self.serve_over_ssh)
            .with_name(self.name.clone().unwrap_or_else(|| self.callsign.to_string()));
        match &self.local_path {
            Some(path) => record.with_local_path(path.clone()),
            None => record,
        }
    }

    /// Whether `viewer` may see this repository
    pub fn is_visible_to(&self, viewer: &ViewerId) -> bool {
        match self.visibility {
            Visibility::Public => true,
            Visibility::Members => self.members.contains(viewer) || self.pushers.contains(viewer),
        }
    }

    /// Whether `viewer` is granted push
    pub fn grants_push_to(&self, viewer: &ViewerId) -> bool {
        self.pushers.contains(viewer)
    }
}

impl GateConfig {
    /// Parse and validate configuration text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GateConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        debug!(
            path = %path.display(),
            repositories = config.repositories.len(),
            "Loaded gatehouse configuration"
        );
        Ok(config)
    }

    /// Find the entry for `callsign`
    pub fn repository(&self, callsign: &Callsign) -> Option<&RepositoryEntry> {
        self.repositories.iter().find(|entry| &entry.callsign == callsign)
    }
}

impl ConfigValidation for GateConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for entry in &self.repositories {
            if !seen.insert(&entry.callsign) {
                return Err(ConfigError::Invalid(format!(
                    "callsign \"{}\" is declared more than once",
                    entry.callsign
                )));
            }
            if entry.visibility == Visibility::Members
                && entry.members.is_empty()
                && entry.pushers.is_empty()
            {
                return Err(ConfigError::Invalid(format!(
                    "repository \"{}\" is members-only but lists no members",
                    entry.callsign
                )));
            }
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Invalid("logging.level must not be empty".to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const SAMPLE: &str = r#"
[logging]
level = "info"

[[repository]]
callsign = "ABC"
name = "Alphabet"
serve_over_ssh = "readwrite"
local_path = "/srv/repo/abc.git"
pushers = ["alice"]

[[repository]]
callsign = "SEC"
vcs = "hg"
serve_over_ssh = "readonly"
visibility = "members"
members = ["bob"]
"#;

    #[test]
    fn test_parses_sample() {
        let config = GateConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.repositories.len(), 2);

        let abc = config.repository(&"ABC".parse().unwrap()).unwrap();
        let record = abc.to_record();
        assert_eq!(record.name(), "Alphabet");
        assert_eq!(record.serve_mode(), ServeMode::ReadWrite);
        assert!(abc.grants_push_to(&ViewerId::new("alice")));
        assert!(!abc.grants_push_to(&ViewerId::new("bob")));

        let sec = config.repository(&"SEC".parse().unwrap()).unwrap();
        assert_eq!(sec.vcs, VcsKind::Hg);
        assert_eq!(sec.to_record().name(), "SEC");
        assert!(sec.is_visible_to(&ViewerId::new("bob")));
        assert!(!sec.is_visible_to(&ViewerId::new("alice")));
    }

    #[test]
    fn test_defaults() {
        let config = GateConfig::from_toml_str("[[repository]]\ncallsign = \"Q\"\n").unwrap();
        assert_eq!(config.logging, LoggingConfig::default());
        let entry = &config.repositories[0];
        assert_eq!(entry.serve_over_ssh, "off");
        assert_eq!(entry.visibility, Visibility::Public);
        assert_eq!(entry.to_record().serve_mode(), ServeMode::Disabled);
    }

    #[test]
    fn test_rejects_duplicate_callsigns() {
        let text = "[[repository]]\ncallsign = \"A\"\n[[repository]]\ncallsign = \"A\"\n";
        assert_matches!(GateConfig::from_toml_str(text), Err(ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_empty_members_only_repository() {
        let text = "[[repository]]\ncallsign = \"A\"\nvisibility = \"members\"\n";
        assert_matches!(GateConfig::from_toml_str(text), Err(ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_malformed_callsign() {
        let text = "[[repository]]\ncallsign = \"abc\"\n";
        assert_matches!(GateConfig::from_toml_str(text), Err(ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = GateConfig::load_from_file(Path::new("/nonexistent/gatehouse.toml"));
        assert_matches!(result, Err(ConfigError::Io { .. }));
    }
}
