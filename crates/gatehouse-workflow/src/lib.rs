#![deny(clippy::await_holding_lock)]
//! # Gatehouse Workflow - Layer 4: Access Pipeline
//!
//! Resolves the repository named by a remote command, enforces the
//! repository's serve mode, authorizes writes lazily against the capability
//! policy, and dispatches to the operation-specific workflow. Every failure
//! becomes exactly one error-channel line and exit status `1`.
//!
//! Control flow:
//!
//! ```text
//! WorkflowDispatcher
//!   └── resolve_callsign ─→ resolve_repository ─→ check_servable
//!         └── RepositoryWorkflow::perform_operation
//!               └── SessionScope::ensure_write_access ─→ CapabilityPolicy
//! ```

pub mod authorizer;
pub mod commands;
pub mod dispatcher;
pub mod gate;
pub mod prelude;
pub mod resolver;
pub mod session;
pub mod workflows;

pub use authorizer::ensure_write_access;
pub use commands::parse_workflow;
pub use dispatcher::{RepositoryWorkflow, SessionScope, WorkflowDispatcher, EXIT_FAILURE, EXIT_SUCCESS};
pub use gate::check_servable;
pub use resolver::{resolve_callsign, resolve_repository, REPOSITORY_PATH_PATTERN};
pub use session::{Session, WriteAccess};
pub use workflows::{GitReceivePack, GitUploadPack, HgServe};
