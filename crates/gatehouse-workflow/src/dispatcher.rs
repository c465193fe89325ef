//! Workflow dispatcher
//!
//! The single point where failures become transport output. Everything below
//! the dispatcher returns [`GateResult`] and propagates with `?`; the
//! dispatcher writes one `"<FailureKind>: <detail>"` line to the error channel
//! and returns [`EXIT_FAILURE`]. Successful runs return the operation's own
//! exit status and write nothing.

use crate::authorizer::ensure_write_access;
use crate::commands::parse_workflow;
use crate::gate::check_servable;
use crate::resolver::{resolve_callsign, resolve_repository};
use crate::session::Session;
use gatehouse_core::{
    CapabilityPolicy, ErrorChannel, GateError, GateResult, OperationHandoff, RepositoryDirectory,
    RepositoryRecord, RequestArgs, ViewerId,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Exit status for a successful dispatch
pub const EXIT_SUCCESS: i32 = 0;
/// Exit status for any handled failure
pub const EXIT_FAILURE: i32 = 1;

/// Operation-specific behavior plugged into the dispatcher
///
/// Each remote command derives the repository path from its own argument
/// shape and performs its own work once the repository is resolved.
pub trait RepositoryWorkflow {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Extract the repository path from the request arguments
    fn request_path<'a>(&self, args: &'a RequestArgs) -> GateResult<&'a str>;

    /// Run the operation against the resolved, servable repository
    fn perform_operation(
        &self,
        scope: &mut SessionScope<'_>,
        repository: &RepositoryRecord,
    ) -> GateResult<i32>;
}

impl<T: RepositoryWorkflow + ?Sized> RepositoryWorkflow for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn request_path<'a>(&self, args: &'a RequestArgs) -> GateResult<&'a str> {
        (**self).request_path(args)
    }

    fn perform_operation(
        &self,
        scope: &mut SessionScope<'_>,
        repository: &RepositoryRecord,
    ) -> GateResult<i32> {
        (**self).perform_operation(scope, repository)
    }
}

/// What an operation handler may do with its session
pub struct SessionScope<'a> {
    session: &'a mut Session,
    policy: &'a dyn CapabilityPolicy,
}

impl<'a> SessionScope<'a> {
    pub(crate) fn new(session: &'a mut Session, policy: &'a dyn CapabilityPolicy) -> Self {
        Self { session, policy }
    }

    /// Viewer the session acts for
    pub fn viewer(&self) -> &ViewerId {
        self.session.viewer()
    }

    /// Request arguments
    pub fn args(&self) -> &RequestArgs {
        self.session.args()
    }

    /// Require write access, evaluating the push capability on first use
    pub fn ensure_write_access(&mut self) -> GateResult<()> {
        ensure_write_access(self.session, self.policy)
    }

    /// Underlying session
    pub fn session(&self) -> &Session {
        &*self.session
    }
}

/// Resolves, gates, and dispatches remote repository operations
pub struct WorkflowDispatcher<D, P, C> {
    directory: D,
    policy: P,
    channel: C,
}

impl<D, P, C> WorkflowDispatcher<D, P, C>
where
    D: RepositoryDirectory,
    P: CapabilityPolicy,
    C: ErrorChannel,
{
    /// Create a dispatcher over the given collaborators
    pub fn new(directory: D, policy: P, channel: C) -> Self {
        Self {
            directory,
            policy,
            channel,
        }
    }

    /// Run `workflow` for `viewer`, returning the process exit status
    pub fn execute(
        &mut self,
        viewer: ViewerId,
        args: RequestArgs,
        workflow: &dyn RepositoryWorkflow,
    ) -> i32 {
        let mut session = Session::new(viewer, args);
        info!(
            workflow = workflow.name(),
            viewer = %session.viewer(),
            "Dispatching repository workflow"
        );
        match self.run(&mut session, workflow) {
            Ok(code) => {
                debug!(workflow = workflow.name(), code, "Workflow completed");
                code
            }
            Err(err) => self.fail(&err),
        }
    }

    /// Parse a raw remote command, select its workflow, and run it
    ///
    /// Parsing and selection failures are reported exactly like failures
    /// raised during the workflow itself.
    pub fn execute_command(
        &mut self,
        viewer: ViewerId,
        command: &str,
        handoff: &dyn OperationHandoff,
    ) -> i32 {
        match RequestArgs::parse_command(command) {
            Ok(args) => self.execute_args(viewer, args, handoff),
            Err(err) => self.fail(&err),
        }
    }

    /// Select the workflow for already-split arguments and run it
    pub fn execute_args(
        &mut self,
        viewer: ViewerId,
        args: RequestArgs,
        handoff: &dyn OperationHandoff,
    ) -> i32 {
        let workflow = match parse_workflow(&args, handoff) {
            Ok(workflow) => workflow,
            Err(err) => return self.fail(&err),
        };
        self.execute(viewer, args, workflow.as_ref())
    }

    /// Error channel, for callers that need to inspect it
    pub fn channel(&self) -> &C {
        &self.channel
    }

    fn run(&self, session: &mut Session, workflow: &dyn RepositoryWorkflow) -> GateResult<i32> {
        let repository = self.load_repository(session, workflow)?;
        session.install_repository(repository.clone());
        let mut scope = SessionScope::new(session, &self.policy);
        workflow.perform_operation(&mut scope, &repository)
    }

    fn load_repository(
        &self,
        session: &Session,
        workflow: &dyn RepositoryWorkflow,
    ) -> GateResult<Arc<RepositoryRecord>> {
        let path = workflow.request_path(session.args())?;
        let callsign = resolve_callsign(path)?;
        let repository = resolve_repository(&self.directory, session.viewer(), &callsign)?;
        check_servable(&repository)?;
        Ok(repository)
    }

    fn fail(&mut self, err: &GateError) -> i32 {
        info!(kind = %err.kind(), detail = %err, "Request failed");
        self.channel.write(&err.report_line());
        EXIT_FAILURE
    }
}
