//! Unified error system for the access layer
//!
//! Every failure raised by path resolution, repository resolution, serve-mode
//! checks, or an operation handler is a [`GateError`]. Failures propagate
//! unchanged to the workflow dispatcher, which is the only place that turns
//! them into an error-channel line and a nonzero exit status.

use crate::types::{Callsign, ViewerId};
use std::fmt;

/// Example path shown to callers who send a malformed repository path.
pub const EXPECTED_PATH_EXAMPLE: &str = "/diffusion/X/";

/// Name of the remote transport used in user-facing messages.
pub const TRANSPORT_NAME: &str = "SSH";

/// Unified error type for all gatehouse operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// Request path does not have the repository-path shape
    #[error("Unrecognized repository path \"{path}\". Expected a path like \"{expected}\".")]
    MalformedPath {
        /// The offending path, verbatim
        path: String,
        /// Example of an accepted path
        expected: &'static str,
    },

    /// Callsign does not resolve to a repository visible to the viewer
    #[error("No repository \"{callsign}\" exists!")]
    NotFound {
        /// Callsign that failed to resolve
        callsign: String,
    },

    /// Repository's serve mode forbids this transport entirely
    #[error("Repository \"{callsign}\" is not available over {}.", TRANSPORT_NAME)]
    TransportDisabled {
        /// Repository that refused the connection
        callsign: String,
    },

    /// Write attempted against a repository served read-only over this transport
    #[error("Repository \"{callsign}\" is read-only over {}.", TRANSPORT_NAME)]
    ReadOnlyTransport {
        /// Repository that refused the write
        callsign: String,
    },

    /// Viewer lacks the push capability on a read-write repository
    #[error("User \"{viewer}\" does not have permission to push to repository \"{callsign}\".")]
    PermissionDenied {
        /// Viewer that was denied
        viewer: String,
        /// Repository the push targeted
        callsign: String,
    },

    /// Remote command could not be understood
    #[error("{message}")]
    InvalidRequest {
        /// Description of what was wrong with the request
        message: String,
    },

    /// Operation handler failed after authorization succeeded
    #[error("{message}")]
    OperationFailed {
        /// Description of the handler failure
        message: String,
    },
}

impl GateError {
    /// Create a malformed path error for `path`
    pub fn malformed_path(path: impl Into<String>) -> Self {
        Self::MalformedPath {
            path: path.into(),
            expected: EXPECTED_PATH_EXAMPLE,
        }
    }

    /// Create a not found error naming `callsign`
    pub fn not_found(callsign: &Callsign) -> Self {
        Self::NotFound {
            callsign: callsign.to_string(),
        }
    }

    /// Create a transport disabled error for `callsign`
    pub fn transport_disabled(callsign: &Callsign) -> Self {
        Self::TransportDisabled {
            callsign: callsign.to_string(),
        }
    }

    /// Create a read-only transport error for `callsign`
    pub fn read_only_transport(callsign: &Callsign) -> Self {
        Self::ReadOnlyTransport {
            callsign: callsign.to_string(),
        }
    }

    /// Create a permission denied error naming the viewer and repository
    pub fn permission_denied(viewer: &ViewerId, callsign: &Callsign) -> Self {
        Self::PermissionDenied {
            viewer: viewer.to_string(),
            callsign: callsign.to_string(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create an operation failure
    pub fn operation_failed(message: impl Into<String>) -> Self {
        Self::OperationFailed {
            message: message.into(),
        }
    }

    /// The wire-visible kind of this failure
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MalformedPath { .. } => FailureKind::MalformedPath,
            Self::NotFound { .. } => FailureKind::NotFound,
            Self::TransportDisabled { .. } => FailureKind::TransportDisabled,
            Self::ReadOnlyTransport { .. } => FailureKind::ReadOnlyTransport,
            Self::PermissionDenied { .. } => FailureKind::PermissionDenied,
            Self::InvalidRequest { .. } => FailureKind::InvalidRequest,
            Self::OperationFailed { .. } => FailureKind::OperationFailed,
        }
    }

    /// Render the single line written to the error channel: `"<FailureKind>: <detail>"`
    pub fn report_line(&self) -> String {
        format!("{}: {self}", self.kind())
    }
}

/// Failure kinds as they appear on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// See [`GateError::MalformedPath`]
    MalformedPath,
    /// See [`GateError::NotFound`]
    NotFound,
    /// See [`GateError::TransportDisabled`]
    TransportDisabled,
    /// See [`GateError::ReadOnlyTransport`]
    ReadOnlyTransport,
    /// See [`GateError::PermissionDenied`]
    PermissionDenied,
    /// See [`GateError::InvalidRequest`]
    InvalidRequest,
    /// See [`GateError::OperationFailed`]
    OperationFailed,
}

impl FailureKind {
    /// Wire name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedPath => "MalformedPath",
            Self::NotFound => "NotFound",
            Self::TransportDisabled => "TransportDisabled",
            Self::ReadOnlyTransport => "ReadOnlyTransport",
            Self::PermissionDenied => "PermissionDenied",
            Self::InvalidRequest => "InvalidRequest",
            Self::OperationFailed => "OperationFailed",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standard Result type for gatehouse operations
pub type GateResult<T> = std::result::Result<T, GateError>;

impl From<std::io::Error> for GateError {
    fn from(err: std::io::Error) -> Self {
        Self::operation_failed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn callsign(s: &str) -> Callsign {
        s.parse().unwrap()
    }

    #[test]
    fn test_report_line_prefixes_kind() {
        let err = GateError::not_found(&callsign("X"));
        assert_eq!(err.report_line(), "NotFound: No repository \"X\" exists!");
    }

    #[test]
    fn test_malformed_path_carries_path_and_example() {
        let err = GateError::malformed_path("/not-diffusion/X");
        let line = err.report_line();
        assert!(line.starts_with("MalformedPath: "));
        assert!(line.contains("/not-diffusion/X"));
        assert!(line.contains(EXPECTED_PATH_EXAMPLE));
    }

    #[test]
    fn test_permission_denied_names_viewer_and_repository() {
        let err = GateError::permission_denied(&ViewerId::new("alice"), &callsign("ABC"));
        assert_eq!(err.kind(), FailureKind::PermissionDenied);
        let detail = err.to_string();
        assert!(detail.contains("alice"));
        assert!(detail.contains("ABC"));
    }

    #[test]
    fn test_transport_kinds_are_distinct() {
        let cs = callsign("R");
        assert_ne!(
            GateError::transport_disabled(&cs).kind(),
            GateError::read_only_transport(&cs).kind()
        );
        assert!(GateError::read_only_transport(&cs)
            .report_line()
            .starts_with("ReadOnlyTransport: "));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "git-upload-pack missing");
        let err = GateError::from(io_err);
        assert_eq!(err.kind(), FailureKind::OperationFailed);
        assert!(err.to_string().contains("git-upload-pack missing"));
    }
}
