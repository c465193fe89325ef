//! Gatehouse Workflow prelude.
//!
//! Curated re-exports for embedding the access pipeline.

pub use crate::dispatcher::{RepositoryWorkflow, SessionScope, WorkflowDispatcher};
pub use crate::session::{Session, WriteAccess};
pub use gatehouse_core::{
    Callsign, Capability, CapabilityPolicy, ErrorChannel, GateError, GateResult, OperationHandoff,
    RepositoryDirectory, RepositoryRecord, RequestArgs, ServeMode, ViewerId,
};
