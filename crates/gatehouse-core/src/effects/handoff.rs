//! Data-plane handoff effect
//!
//! Once a workflow has resolved and authorized a repository, the actual
//! protocol exchange (clone, fetch, push) belongs to an external service.
//! The handoff returns that service's exit status.

use crate::errors::GateResult;
use crate::types::{RepositoryRecord, RequestArgs, ViewerId};
use std::fmt;

/// Remote operations the access layer knows how to gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `git-upload-pack`: fetch and clone
    GitUploadPack,
    /// `git-receive-pack`: push
    GitReceivePack,
    /// `hg serve --stdio`
    HgServe,
}

impl Operation {
    /// Whether the operation only ever writes
    ///
    /// `hg serve` is not a write operation; it may carry pushes, so its
    /// handoff is told through [`HandoffRequest::writable`] whether to accept them.
    pub fn is_write(&self) -> bool {
        matches!(self, Self::GitReceivePack)
    }

    /// Service program name
    pub fn program(&self) -> &'static str {
        match self {
            Self::GitUploadPack => "git-upload-pack",
            Self::GitReceivePack => "git-receive-pack",
            Self::HgServe => "hg",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HgServe => f.write_str("hg serve"),
            other => f.write_str(other.program()),
        }
    }
}

/// Everything a data-plane service needs to serve an authorized request
#[derive(Debug, Clone, Copy)]
pub struct HandoffRequest<'a> {
    /// Operation being served
    pub operation: Operation,
    /// Resolved repository
    pub repository: &'a RepositoryRecord,
    /// Viewer the session acts for
    pub viewer: &'a ViewerId,
    /// Original request arguments
    pub args: &'a RequestArgs,
    /// Whether the session holds write access; services must refuse writes otherwise
    pub writable: bool,
}

/// Runs the data plane for an authorized operation
pub trait OperationHandoff {
    /// Serve `request`, returning the service's exit status
    fn hand_off(&self, request: HandoffRequest<'_>) -> GateResult<i32>;
}

impl<T: OperationHandoff + ?Sized> OperationHandoff for &T {
    fn hand_off(&self, request: HandoffRequest<'_>) -> GateResult<i32> {
        (**self).hand_off(request)
    }
}
