//! Capability policy effect
//!
//! Capabilities are named permissions evaluated for a (viewer, resource)
//! pair. The access layer checks exactly one of them: [`Capability::PUSH`].

use crate::types::{RepositoryRecord, ViewerId};
use std::fmt;
use std::sync::Arc;

/// A named capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capability(&'static str);

impl Capability {
    /// Permission to write (push) to a repository
    pub const PUSH: Capability = Capability("repository.push");

    /// Define a capability by name
    pub const fn named(name: &'static str) -> Self {
        Self(name)
    }

    /// Capability name as evaluated by the policy engine
    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Evaluates capability grants
pub trait CapabilityPolicy {
    /// Whether `viewer` holds `capability` on `repository`
    fn has_capability(
        &self,
        viewer: &ViewerId,
        repository: &RepositoryRecord,
        capability: Capability,
    ) -> bool;
}

impl<T: CapabilityPolicy + ?Sized> CapabilityPolicy for &T {
    fn has_capability(
        &self,
        viewer: &ViewerId,
        repository: &RepositoryRecord,
        capability: Capability,
    ) -> bool {
        (**self).has_capability(viewer, repository, capability)
    }
}

impl<T: CapabilityPolicy + ?Sized> CapabilityPolicy for Arc<T> {
    fn has_capability(
        &self,
        viewer: &ViewerId,
        repository: &RepositoryRecord,
        capability: Capability,
    ) -> bool {
        (**self).has_capability(viewer, repository, capability)
    }
}
