//! # Gatehouse Core - Layer 1: Types and Collaborator Interfaces
//!
//! Shared vocabulary for the repository access layer that sits in front of
//! version-control operations requested over a remote shell transport:
//!
//! - **Identifiers**: [`Callsign`], [`ViewerId`]
//! - **Repository model**: [`RepositoryRecord`], [`ServeMode`]
//! - **Errors**: [`GateError`] and its wire-visible [`FailureKind`]
//! - **Effects**: the collaborators the workflow layer calls out to
//!   (repository directory, capability policy, error channel, data-plane handoff)
//! - **Configuration**: the TOML model backing the default collaborators
//!
//! This crate holds no mutable state and performs no I/O outside of
//! [`config::GateConfig::load_from_file`].

pub mod config;
pub mod effects;
pub mod errors;
pub mod types;

pub use config::{ConfigError, ConfigValidation, GateConfig, LoggingConfig, RepositoryEntry, Visibility};
pub use effects::{
    Capability, CapabilityPolicy, ErrorChannel, HandoffRequest, Operation, OperationHandoff,
    RepositoryDirectory,
};
pub use errors::{FailureKind, GateError, GateResult};
pub use types::{
    Callsign, InvalidCallsign, RepositoryRecord, RequestArgs, ServeMode, VcsKind, ViewerId,
};
