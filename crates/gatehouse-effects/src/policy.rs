//! Configuration-backed capability policy

use gatehouse_core::{
    Callsign, Capability, CapabilityPolicy, GateConfig, RepositoryRecord, ViewerId,
};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Grants [`Capability::PUSH`] to the viewers listed in a repository's `pushers`
///
/// Every other capability is denied.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredPolicy {
    pushers: HashMap<Callsign, HashSet<ViewerId>>,
}

impl ConfiguredPolicy {
    /// Build from a validated configuration
    pub fn from_config(config: &GateConfig) -> Self {
        Self {
            pushers: config
                .repositories
                .iter()
                .map(|entry| (entry.callsign.clone(), entry.pushers.iter().cloned().collect()))
                .collect(),
        }
    }

    /// Grant push on `callsign` to `viewer`
    pub fn grant_push(&mut self, callsign: Callsign, viewer: ViewerId) {
        self.pushers.entry(callsign).or_default().insert(viewer);
    }
}

impl CapabilityPolicy for ConfiguredPolicy {
    fn has_capability(
        &self,
        viewer: &ViewerId,
        repository: &RepositoryRecord,
        capability: Capability,
    ) -> bool {
        let granted = capability == Capability::PUSH
            && self
                .pushers
                .get(repository.callsign())
                .is_some_and(|viewers| viewers.contains(viewer));
        debug!(
            %viewer,
            callsign = %repository.callsign(),
            %capability,
            granted,
            "Evaluated capability"
        );
        granted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_core::VcsKind;

    fn record(callsign: &str) -> RepositoryRecord {
        RepositoryRecord::new(callsign.parse().unwrap(), VcsKind::Git, "readwrite")
    }

    #[test]
    fn test_push_granted_to_listed_pushers_only() {
        let config = GateConfig::from_toml_str(
            "[[repository]]\ncallsign = \"ABC\"\npushers = [\"alice\"]\n",
        )
        .unwrap();
        let policy = ConfiguredPolicy::from_config(&config);
        let repo = record("ABC");
        assert!(policy.has_capability(&ViewerId::new("alice"), &repo, Capability::PUSH));
        assert!(!policy.has_capability(&ViewerId::new("bob"), &repo, Capability::PUSH));
    }

    #[test]
    fn test_other_capabilities_denied() {
        let mut policy = ConfiguredPolicy::default();
        policy.grant_push("ABC".parse().unwrap(), ViewerId::new("alice"));
        let edit = Capability::named("repository.edit");
        assert!(!policy.has_capability(&ViewerId::new("alice"), &record("ABC"), edit));
    }

    #[test]
    fn test_unknown_repository_denied() {
        let policy = ConfiguredPolicy::default();
        assert!(!policy.has_capability(&ViewerId::new("alice"), &record("ZZZ"), Capability::PUSH));
    }
}
