//! Per-connection session state

use gatehouse_core::{RepositoryRecord, RequestArgs, ViewerId};
use std::sync::Arc;

/// Cached outcome of the write-access check
///
/// Only the write-access authorizer changes this. Once a verdict is recorded
/// it holds for the rest of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteAccess {
    /// Not yet evaluated
    #[default]
    Unknown,
    /// Policy granted push
    Granted,
    /// Policy denied push
    Denied,
}

/// State of one dispatched request
///
/// Lives exactly as long as the request; nothing here is shared with other
/// sessions.
#[derive(Debug)]
pub struct Session {
    viewer: ViewerId,
    args: RequestArgs,
    repository: Option<Arc<RepositoryRecord>>,
    write_access: WriteAccess,
}

impl Session {
    /// Begin a session for `viewer` with the parsed request arguments
    pub fn new(viewer: ViewerId, args: RequestArgs) -> Self {
        Self {
            viewer,
            args,
            repository: None,
            write_access: WriteAccess::Unknown,
        }
    }

    /// Viewer the session acts for
    pub fn viewer(&self) -> &ViewerId {
        &self.viewer
    }

    /// Request arguments
    pub fn args(&self) -> &RequestArgs {
        &self.args
    }

    /// Resolved repository, once installed
    pub fn repository(&self) -> Option<&Arc<RepositoryRecord>> {
        self.repository.as_ref()
    }

    /// Cached write-access verdict
    pub fn write_access(&self) -> WriteAccess {
        self.write_access
    }

    /// Install the resolved repository
    ///
    /// A session resolves exactly one repository; a second install keeps the first.
    pub fn install_repository(&mut self, repository: Arc<RepositoryRecord>) -> &Arc<RepositoryRecord> {
        self.repository.get_or_insert(repository)
    }

    pub(crate) fn record_write_access(&mut self, verdict: WriteAccess) {
        // Granted is terminal.
        if self.write_access != WriteAccess::Granted {
            self.write_access = verdict;
        }
    }
}
