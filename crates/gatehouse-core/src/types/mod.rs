//! Core value types shared by every gatehouse crate

pub mod identifiers;
pub mod repository;
pub mod request;

pub use identifiers::{Callsign, InvalidCallsign, ViewerId};
pub use repository::{RepositoryRecord, ServeMode, VcsKind};
pub use request::RequestArgs;
