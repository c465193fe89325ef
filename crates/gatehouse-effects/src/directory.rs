//! Configuration-backed repository directory

use gatehouse_core::{
    Callsign, GateConfig, RepositoryDirectory, RepositoryEntry, RepositoryRecord, ViewerId,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Repository directory over the `[[repository]]` entries of a config file
///
/// Applies the entry's visibility policy: a members-only repository is
/// invisible to anyone not listed as a member or pusher.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredDirectory {
    entries: HashMap<Callsign, RepositoryEntry>,
}

impl ConfiguredDirectory {
    /// Build from a validated configuration
    pub fn from_config(config: &GateConfig) -> Self {
        Self::from_entries(config.repositories.iter().cloned())
    }

    /// Build from repository entries; a later duplicate callsign replaces an earlier one
    pub fn from_entries(entries: impl IntoIterator<Item = RepositoryEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.callsign.clone(), entry))
                .collect(),
        }
    }

    /// Number of repositories known
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no repositories are known
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RepositoryDirectory for ConfiguredDirectory {
    fn find_by_callsign(
        &self,
        viewer: &ViewerId,
        callsign: &Callsign,
    ) -> Option<Arc<RepositoryRecord>> {
        let Some(entry) = self.entries.get(callsign) else {
            debug!(%callsign, "No repository with callsign");
            return None;
        };
        if !entry.is_visible_to(viewer) {
            debug!(%callsign, %viewer, "Repository hidden from viewer");
            return None;
        }
        Some(Arc::new(entry.to_record()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_core::{ServeMode, Visibility};

    fn config() -> GateConfig {
        GateConfig::from_toml_str(
            r#"
[[repository]]
callsign = "PUB"
serve_over_ssh = "readonly"

[[repository]]
callsign = "PRIV"
serve_over_ssh = "readwrite"
visibility = "members"
members = ["bob"]
pushers = ["carol"]
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_public_repository_is_visible_to_anyone() {
        let directory = ConfiguredDirectory::from_config(&config());
        let record = directory
            .find_by_callsign(&ViewerId::new("anyone"), &"PUB".parse().unwrap())
            .unwrap();
        assert_eq!(record.callsign().as_str(), "PUB");
        assert_eq!(record.serve_mode(), ServeMode::ReadOnly);
    }

    #[test]
    fn test_members_only_repository_is_filtered() {
        let directory = ConfiguredDirectory::from_config(&config());
        let callsign: Callsign = "PRIV".parse().unwrap();
        assert!(directory.find_by_callsign(&ViewerId::new("alice"), &callsign).is_none());
        assert!(directory.find_by_callsign(&ViewerId::new("bob"), &callsign).is_some());
        assert!(directory.find_by_callsign(&ViewerId::new("carol"), &callsign).is_some());
    }

    #[test]
    fn test_unknown_callsign_is_absent() {
        let directory = ConfiguredDirectory::from_config(&config());
        assert_eq!(directory.len(), 2);
        assert!(directory
            .find_by_callsign(&ViewerId::new("bob"), &"NOPE".parse().unwrap())
            .is_none());
    }

    #[test]
    fn test_records_reflect_current_entries() {
        let mut entry = config().repositories[0].clone();
        entry.visibility = Visibility::Public;
        entry.serve_over_ssh = "off".to_owned();
        let directory = ConfiguredDirectory::from_entries([entry]);
        let record = directory
            .find_by_callsign(&ViewerId::new("x"), &"PUB".parse().unwrap())
            .unwrap();
        assert_eq!(record.serve_mode(), ServeMode::Disabled);
    }
}
