//! # Gatehouse Effects - Layer 3: Collaborator Handlers
//!
//! Concrete implementations of the collaborator traits declared in
//! `gatehouse_core::effects`:
//!
//! - [`ConfiguredDirectory`] / [`ConfiguredPolicy`]: repository lookup and
//!   push grants backed by a [`GateConfig`](gatehouse_core::GateConfig)
//! - [`StderrChannel`] / [`MemoryChannel`]: error channels
//! - [`ProcessHandoff`] / [`NoopHandoff`]: data-plane handoff

pub mod channel;
pub mod directory;
pub mod handoff;
pub mod policy;

pub use channel::{MemoryChannel, StderrChannel};
pub use directory::ConfiguredDirectory;
pub use handoff::{NoopHandoff, ProcessHandoff};
pub use policy::ConfiguredPolicy;
