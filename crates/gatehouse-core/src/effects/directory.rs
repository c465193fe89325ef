//! Repository directory effect

use crate::types::{Callsign, RepositoryRecord, ViewerId};
use std::sync::Arc;

/// Resolves callsigns to repository records
///
/// Implementations apply object visibility for `viewer`: a repository the
/// viewer may not see is reported exactly like one that does not exist.
/// Callsigns are unique, so at most one record is ever returned.
pub trait RepositoryDirectory {
    /// Look up the repository named by `callsign` as seen by `viewer`
    fn find_by_callsign(&self, viewer: &ViewerId, callsign: &Callsign)
        -> Option<Arc<RepositoryRecord>>;
}

impl<T: RepositoryDirectory + ?Sized> RepositoryDirectory for &T {
    fn find_by_callsign(
        &self,
        viewer: &ViewerId,
        callsign: &Callsign,
    ) -> Option<Arc<RepositoryRecord>> {
        (**self).find_by_callsign(viewer, callsign)
    }
}

impl<T: RepositoryDirectory + ?Sized> RepositoryDirectory for Arc<T> {
    fn find_by_callsign(
        &self,
        viewer: &ViewerId,
        callsign: &Callsign,
    ) -> Option<Arc<RepositoryRecord>> {
        (**self).find_by_callsign(viewer, callsign)
    }
}
