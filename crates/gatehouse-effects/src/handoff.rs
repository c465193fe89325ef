//! Data-plane handoff handlers

use gatehouse_core::{GateError, GateResult, HandoffRequest, Operation, OperationHandoff};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Environment variable carrying the viewer name into the service process
pub const VIEWER_ENV: &str = "GATEHOUSE_VIEWER";
/// Environment variable carrying the repository callsign into the service process
pub const CALLSIGN_ENV: &str = "GATEHOUSE_CALLSIGN";

/// Mercurial hooks that abort any incoming changegroup or pushkey update
pub const HG_REFUSE_PUSH_HOOKS: [&str; 2] = [
    "hooks.pretxnchangegroup.gatehouse=false",
    "hooks.prepushkey.gatehouse=false",
];

/// Hands authorized operations to the VCS service programs
///
/// The child inherits stdin, stdout, and stderr, so the protocol exchange
/// flows directly between the remote client and the service.
#[derive(Debug, Clone, Default)]
pub struct ProcessHandoff {
    program_dir: Option<PathBuf>,
}

impl ProcessHandoff {
    /// Resolve service programs through `PATH`
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve service programs inside `dir` instead of through `PATH`
    pub fn with_program_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.program_dir = Some(dir.into());
        self
    }

    /// Build the service command for `request` without running it
    ///
    /// A write operation without write access is refused outright. `hg serve`
    /// without write access is started with hooks that reject every push.
    pub fn command_for(&self, request: &HandoffRequest<'_>) -> GateResult<Command> {
        if request.operation.is_write() && !request.writable {
            return Err(GateError::operation_failed(format!(
                "Refusing to start {} without write access to \"{}\".",
                request.operation,
                request.repository.callsign()
            )));
        }
        let local_path = request.repository.local_path().ok_or_else(|| {
            GateError::operation_failed(format!(
                "Repository \"{}\" has no local path configured.",
                request.repository.callsign()
            ))
        })?;

        let program: OsString = match &self.program_dir {
            Some(dir) => dir.join(request.operation.program()).into_os_string(),
            None => request.operation.program().into(),
        };

        let mut command = Command::new(program);
        match request.operation {
            Operation::GitUploadPack | Operation::GitReceivePack => {
                command.arg(local_path);
            }
            Operation::HgServe => {
                command.arg("-R").arg(local_path);
                if !request.writable {
                    for hook in HG_REFUSE_PUSH_HOOKS {
                        command.args(["--config", hook]);
                    }
                }
                command.args(["serve", "--stdio"]);
            }
        }
        command
            .env(VIEWER_ENV, request.viewer.as_str())
            .env(CALLSIGN_ENV, request.repository.callsign().as_str())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        Ok(command)
    }
}

impl OperationHandoff for ProcessHandoff {
    fn hand_off(&self, request: HandoffRequest<'_>) -> GateResult<i32> {
        let mut command = self.command_for(&request)?;
        debug!(
            operation = %request.operation,
            callsign = %request.repository.callsign(),
            program = ?command.get_program(),
            writable = request.writable,
            "Spawning service process"
        );

        let status = command.status().map_err(|err| {
            GateError::operation_failed(format!(
                "Unable to start {}: {err}",
                request.operation.program()
            ))
        })?;

        // A service killed by a signal has no exit code; report it as a failure.
        let code = status.code().unwrap_or(1);
        info!(
            operation = %request.operation,
            callsign = %request.repository.callsign(),
            viewer = %request.viewer,
            code,
            "Service process exited"
        );
        Ok(code)
    }
}

/// Accepts every handoff without running anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHandoff;

impl OperationHandoff for NoopHandoff {
    fn hand_off(&self, request: HandoffRequest<'_>) -> GateResult<i32> {
        info!(
            operation = %request.operation,
            callsign = %request.repository.callsign(),
            viewer = %request.viewer,
            "Dry run: skipping service process"
        );
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use gatehouse_core::{RepositoryRecord, RequestArgs, VcsKind, ViewerId};

    fn request<'a>(
        operation: Operation,
        repository: &'a RepositoryRecord,
        viewer: &'a ViewerId,
        args: &'a RequestArgs,
    ) -> HandoffRequest<'a> {
        HandoffRequest {
            operation,
            repository,
            viewer,
            args,
            writable: operation.is_write(),
        }
    }

    #[test]
    fn test_git_command_targets_local_path() {
        let repo = RepositoryRecord::new("ABC".parse().unwrap(), VcsKind::Git, "readwrite")
            .with_local_path("/srv/abc.git");
        let viewer = ViewerId::new("alice");
        let args = RequestArgs::default();
        let handoff = ProcessHandoff::new().with_program_dir("/usr/lib/git-core");

        let command = handoff
            .command_for(&request(Operation::GitReceivePack, &repo, &viewer, &args))
            .unwrap();
        assert_eq!(command.get_program(), "/usr/lib/git-core/git-receive-pack");
        let argv: Vec<_> = command.get_args().collect();
        assert_eq!(argv, ["/srv/abc.git"]);
        let envs: Vec<_> = command.get_envs().collect();
        assert!(envs.contains(&(VIEWER_ENV.as_ref(), Some("alice".as_ref()))));
        assert!(envs.contains(&(CALLSIGN_ENV.as_ref(), Some("ABC".as_ref()))));
    }

    #[test]
    fn test_writable_hg_command_shape() {
        let repo = RepositoryRecord::new("HG".parse().unwrap(), VcsKind::Hg, "readwrite")
            .with_local_path("/srv/hg");
        let viewer = ViewerId::new("alice");
        let args = RequestArgs::default();
        let writable = HandoffRequest {
            writable: true,
            ..request(Operation::HgServe, &repo, &viewer, &args)
        };
        let command = ProcessHandoff::new().command_for(&writable).unwrap();
        assert_eq!(command.get_program(), "hg");
        let argv: Vec<_> = command.get_args().collect();
        assert_eq!(argv, ["-R", "/srv/hg", "serve", "--stdio"]);
    }

    #[test]
    fn test_hg_without_write_access_refuses_pushes() {
        let repo = RepositoryRecord::new("HG".parse().unwrap(), VcsKind::Hg, "readonly")
            .with_local_path("/srv/hg");
        let viewer = ViewerId::new("bob");
        let args = RequestArgs::default();
        let read_only = request(Operation::HgServe, &repo, &viewer, &args);
        assert!(!read_only.writable);

        let command = ProcessHandoff::new().command_for(&read_only).unwrap();
        let argv: Vec<_> = command.get_args().collect();
        assert_eq!(
            argv,
            [
                "-R",
                "/srv/hg",
                "--config",
                "hooks.pretxnchangegroup.gatehouse=false",
                "--config",
                "hooks.prepushkey.gatehouse=false",
                "serve",
                "--stdio"
            ]
        );
    }

    #[test]
    fn test_receive_pack_requires_write_access() {
        let repo = RepositoryRecord::new("ABC".parse().unwrap(), VcsKind::Git, "readwrite")
            .with_local_path("/srv/abc.git");
        let viewer = ViewerId::new("mallory");
        let args = RequestArgs::default();
        let unauthorized = HandoffRequest {
            writable: false,
            ..request(Operation::GitReceivePack, &repo, &viewer, &args)
        };
        assert_matches!(
            ProcessHandoff::new().command_for(&unauthorized),
            Err(GateError::OperationFailed { .. })
        );
    }

    #[test]
    fn test_missing_local_path_fails_operation() {
        let repo = RepositoryRecord::new("ABC".parse().unwrap(), VcsKind::Git, "readwrite");
        let viewer = ViewerId::new("alice");
        let args = RequestArgs::default();
        let result =
            ProcessHandoff::new().command_for(&request(Operation::GitUploadPack, &repo, &viewer, &args));
        assert_matches!(result, Err(GateError::OperationFailed { .. }));
    }

    #[test]
    fn test_noop_handoff_succeeds() {
        let repo = RepositoryRecord::new("ABC".parse().unwrap(), VcsKind::Git, "readwrite");
        let viewer = ViewerId::new("alice");
        let args = RequestArgs::default();
        assert_eq!(
            NoopHandoff.hand_off(request(Operation::GitUploadPack, &repo, &viewer, &args)),
            Ok(0)
        );
    }
}
