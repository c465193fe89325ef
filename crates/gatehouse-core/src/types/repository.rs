//! Repository record and its transport serve mode

use super::identifiers::Callsign;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

/// How a repository is exposed over the remote shell transport
///
/// Marked `#[non_exhaustive]` so that every consumer outside this crate must
/// carry a fallback arm. Consumers make that arm fail closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ServeMode {
    /// Transport access refused for reads and writes
    Disabled,
    /// Reads allowed, writes refused
    ReadOnly,
    /// Reads allowed, writes subject to the push capability
    ReadWrite,
}

impl ServeMode {
    /// Setting string for [`ServeMode::Disabled`]
    pub const SETTING_OFF: &'static str = "off";
    /// Setting string for [`ServeMode::ReadOnly`]
    pub const SETTING_READONLY: &'static str = "readonly";
    /// Setting string for [`ServeMode::ReadWrite`]
    pub const SETTING_READWRITE: &'static str = "readwrite";

    /// Classify a configured serve setting
    ///
    /// Unknown settings classify as [`ServeMode::Disabled`].
    pub fn from_setting(setting: &str) -> Self {
        match setting {
            Self::SETTING_READONLY => Self::ReadOnly,
            Self::SETTING_READWRITE => Self::ReadWrite,
            Self::SETTING_OFF => Self::Disabled,
            other => {
                warn!(setting = other, "Unknown serve setting, treating repository as disabled");
                Self::Disabled
            }
        }
    }

    /// Canonical setting string for this mode
    pub fn as_setting(&self) -> &'static str {
        match self {
            Self::Disabled => Self::SETTING_OFF,
            Self::ReadOnly => Self::SETTING_READONLY,
            Self::ReadWrite => Self::SETTING_READWRITE,
        }
    }
}

impl fmt::Display for ServeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_setting())
    }
}

/// Version control system backing a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsKind {
    /// Git
    #[default]
    Git,
    /// Mercurial
    Hg,
    /// Subversion
    Svn,
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Git => f.write_str("git"),
            Self::Hg => f.write_str("hg"),
            Self::Svn => f.write_str("svn"),
        }
    }
}

/// A repository as returned by the repository directory
///
/// The serve setting is kept as configured and classified on every read of
/// [`RepositoryRecord::serve_mode`], so the value a session acts on is the
/// one current at resolution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRecord {
    callsign: Callsign,
    name: String,
    vcs: VcsKind,
    serve_over_ssh: String,
    local_path: Option<PathBuf>,
}

impl RepositoryRecord {
    /// Create a record with the given serve setting
    pub fn new(callsign: Callsign, vcs: VcsKind, serve_over_ssh: impl Into<String>) -> Self {
        Self {
            name: callsign.to_string(),
            callsign,
            vcs,
            serve_over_ssh: serve_over_ssh.into(),
            local_path: None,
        }
    }

    /// Set the human-readable name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the on-disk location the data plane serves from
    pub fn with_local_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_path = Some(path.into());
        self
    }

    /// Repository callsign
    pub fn callsign(&self) -> &Callsign {
        &self.callsign
    }

    /// Human-readable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version control system
    pub fn vcs(&self) -> VcsKind {
        self.vcs
    }

    /// Raw serve setting as configured
    pub fn serve_setting(&self) -> &str {
        &self.serve_over_ssh
    }

    /// Classified serve mode
    pub fn serve_mode(&self) -> ServeMode {
        ServeMode::from_setting(&self.serve_over_ssh)
    }

    /// On-disk location, if one is configured
    pub fn local_path(&self) -> Option<&PathBuf> {
        self.local_path.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_settings_classify() {
        assert_eq!(ServeMode::from_setting("off"), ServeMode::Disabled);
        assert_eq!(ServeMode::from_setting("readonly"), ServeMode::ReadOnly);
        assert_eq!(ServeMode::from_setting("readwrite"), ServeMode::ReadWrite);
    }

    #[test]
    fn test_unknown_settings_fail_closed() {
        for setting in ["", "READWRITE", "read-write", "on", "yes"] {
            assert_eq!(ServeMode::from_setting(setting), ServeMode::Disabled);
        }
    }

    #[test]
    fn test_record_classifies_on_read() {
        let record = RepositoryRecord::new("ABC".parse().unwrap(), VcsKind::Git, "readonly")
            .with_name("Alphabet")
            .with_local_path("/srv/repo/abc.git");
        assert_eq!(record.serve_mode(), ServeMode::ReadOnly);
        assert_eq!(record.serve_setting(), "readonly");
        assert_eq!(record.name(), "Alphabet");
        assert_eq!(
            record.local_path().map(|p| p.to_string_lossy().into_owned()),
            Some("/srv/repo/abc.git".to_owned())
        );
    }
}
