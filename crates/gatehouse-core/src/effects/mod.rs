//! Collaborator trait definitions
//!
//! The workflow layer is parameterized by these traits; handlers live in
//! `gatehouse-effects` (configuration-backed) or in test doubles. This module
//! defines **what** the access layer asks of the outside world, never **how**.
//!
//! | Trait | Collaborator | Called by |
//! |-------|--------------|-----------|
//! | [`RepositoryDirectory`] | Visibility-filtered repository lookup | Dispatcher |
//! | [`CapabilityPolicy`] | Capability grant evaluation | Write-access authorizer |
//! | [`ErrorChannel`] | Line-oriented error output | Dispatcher |
//! | [`OperationHandoff`] | Data-plane service for an authorized operation | Concrete workflows |
//!
//! All calls are synchronous: a session waits on each one.

pub mod directory;
pub mod handoff;
pub mod output;
pub mod policy;

pub use directory::RepositoryDirectory;
pub use handoff::{HandoffRequest, Operation, OperationHandoff};
pub use output::ErrorChannel;
pub use policy::{Capability, CapabilityPolicy};
