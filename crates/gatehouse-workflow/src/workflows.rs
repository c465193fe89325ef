//! Concrete remote-command workflows
//!
//! Each workflow knows where its command line carries the repository path
//! and whether the operation writes. The protocol exchange itself is handed
//! to an [`OperationHandoff`].

use crate::dispatcher::{RepositoryWorkflow, SessionScope};
use gatehouse_core::{
    GateError, GateResult, HandoffRequest, Operation, OperationHandoff, RepositoryRecord,
    RequestArgs, ServeMode, VcsKind,
};
use tracing::debug;

fn hand_off(
    handoff: &dyn OperationHandoff,
    operation: Operation,
    scope: &SessionScope<'_>,
    repository: &RepositoryRecord,
    writable: bool,
) -> GateResult<i32> {
    debug!(
        %operation,
        callsign = %repository.callsign(),
        writable,
        "Handing off authorized operation"
    );
    handoff.hand_off(HandoffRequest {
        operation,
        repository,
        viewer: scope.viewer(),
        args: scope.args(),
        writable,
    })
}

fn require_vcs(repository: &RepositoryRecord, expected: VcsKind) -> GateResult<()> {
    if repository.vcs() == expected {
        Ok(())
    } else {
        Err(GateError::operation_failed(format!(
            "Repository \"{}\" is a {} repository, not a {expected} repository.",
            repository.callsign(),
            repository.vcs()
        )))
    }
}

fn positional_path<'a>(args: &'a RequestArgs, index: usize, command: &str) -> GateResult<&'a str> {
    args.get(index).ok_or_else(|| {
        GateError::invalid_request(format!("{command} requires a repository path argument."))
    })
}

/// `git-upload-pack <path>`: fetch and clone
pub struct GitUploadPack<'h> {
    handoff: &'h dyn OperationHandoff,
    path_index: usize,
}

impl<'h> GitUploadPack<'h> {
    /// Create the workflow; the path is read from argument `path_index`
    pub fn new(handoff: &'h dyn OperationHandoff, path_index: usize) -> Self {
        Self {
            handoff,
            path_index,
        }
    }
}

impl RepositoryWorkflow for GitUploadPack<'_> {
    fn name(&self) -> &'static str {
        "git-upload-pack"
    }

    fn request_path<'a>(&self, args: &'a RequestArgs) -> GateResult<&'a str> {
        positional_path(args, self.path_index, self.name())
    }

    fn perform_operation(
        &self,
        scope: &mut SessionScope<'_>,
        repository: &RepositoryRecord,
    ) -> GateResult<i32> {
        require_vcs(repository, VcsKind::Git)?;
        hand_off(self.handoff, Operation::GitUploadPack, scope, repository, false)
    }
}

/// `git-receive-pack <path>`: push
pub struct GitReceivePack<'h> {
    handoff: &'h dyn OperationHandoff,
    path_index: usize,
}

impl<'h> GitReceivePack<'h> {
    /// Create the workflow; the path is read from argument `path_index`
    pub fn new(handoff: &'h dyn OperationHandoff, path_index: usize) -> Self {
        Self {
            handoff,
            path_index,
        }
    }
}

impl RepositoryWorkflow for GitReceivePack<'_> {
    fn name(&self) -> &'static str {
        "git-receive-pack"
    }

    fn request_path<'a>(&self, args: &'a RequestArgs) -> GateResult<&'a str> {
        positional_path(args, self.path_index, self.name())
    }

    fn perform_operation(
        &self,
        scope: &mut SessionScope<'_>,
        repository: &RepositoryRecord,
    ) -> GateResult<i32> {
        require_vcs(repository, VcsKind::Git)?;
        scope.ensure_write_access()?;
        hand_off(self.handoff, Operation::GitReceivePack, scope, repository, true)
    }
}

/// `hg -R <path> serve --stdio`
///
/// Mercurial negotiates pushes inside the wire protocol, so the session is
/// admitted for reads and the service is told whether to accept writes. On a
/// read-write repository the push capability is evaluated up front; a denial
/// downgrades the session to read-only instead of failing it. Read-only
/// repositories never reach the policy.
pub struct HgServe<'h> {
    handoff: &'h dyn OperationHandoff,
}

impl<'h> HgServe<'h> {
    /// Create the workflow
    pub fn new(handoff: &'h dyn OperationHandoff) -> Self {
        Self { handoff }
    }
}

impl RepositoryWorkflow for HgServe<'_> {
    fn name(&self) -> &'static str {
        "hg serve"
    }

    fn request_path<'a>(&self, args: &'a RequestArgs) -> GateResult<&'a str> {
        args.value_of("-R")
            .ok_or_else(|| GateError::invalid_request("hg serve requires -R <repository path>."))
    }

    fn perform_operation(
        &self,
        scope: &mut SessionScope<'_>,
        repository: &RepositoryRecord,
    ) -> GateResult<i32> {
        require_vcs(repository, VcsKind::Hg)?;
        let writable = match repository.serve_mode() {
            ServeMode::ReadWrite => match scope.ensure_write_access() {
                Ok(()) => true,
                Err(GateError::PermissionDenied { .. }) => false,
                Err(err) => return Err(err),
            },
            _ => false,
        };
        hand_off(self.handoff, Operation::HgServe, scope, repository, writable)
    }
}
