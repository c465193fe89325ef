//! Remote command selection

use crate::dispatcher::RepositoryWorkflow;
use crate::workflows::{GitReceivePack, GitUploadPack, HgServe};
use gatehouse_core::{GateError, GateResult, OperationHandoff, RequestArgs};

/// Select the workflow for a parsed remote command
///
/// Recognized forms:
///
/// - `git-upload-pack <path>` and `git upload-pack <path>`
/// - `git-receive-pack <path>` and `git receive-pack <path>`
/// - `hg -R <path> serve --stdio`
pub fn parse_workflow<'h>(
    args: &RequestArgs,
    handoff: &'h dyn OperationHandoff,
) -> GateResult<Box<dyn RepositoryWorkflow + 'h>> {
    let Some(command) = args.command() else {
        return Err(GateError::invalid_request(
            "No remote command was given; this account only serves repositories.",
        ));
    };

    let workflow: Box<dyn RepositoryWorkflow + 'h> = match (command, args.get(1)) {
        ("git-upload-pack", _) => Box::new(GitUploadPack::new(handoff, 1)),
        ("git-receive-pack", _) => Box::new(GitReceivePack::new(handoff, 1)),
        ("git", Some("upload-pack")) => Box::new(GitUploadPack::new(handoff, 2)),
        ("git", Some("receive-pack")) => Box::new(GitReceivePack::new(handoff, 2)),
        ("hg", _) if args.has_flag("serve") && args.has_flag("--stdio") => {
            Box::new(HgServe::new(handoff))
        }
        _ => {
            return Err(GateError::invalid_request(format!(
                "Unknown remote command \"{}\".",
                args.argv().join(" ")
            )))
        }
    };
    Ok(workflow)
}
