//! Serve-mode gate
//!
//! | Mode | Reads | Writes |
//! |------|-------|--------|
//! | `Disabled` | refused at session start | refused |
//! | `ReadOnly` | allowed | refused when first attempted |
//! | `ReadWrite` | allowed | subject to the push capability |
//!
//! Only the "reachable at all" question is answered here. Distinguishing
//! read-only from read-write is deferred to the first write attempt, since
//! most sessions only read.

use gatehouse_core::{GateError, GateResult, RepositoryRecord, ServeMode};
use tracing::{debug, warn};

/// Reject repositories not servable over this transport
pub fn check_servable(repository: &RepositoryRecord) -> GateResult<()> {
    let callsign = repository.callsign();
    match repository.serve_mode() {
        ServeMode::ReadOnly | ServeMode::ReadWrite => {
            debug!(%callsign, serve_mode = %repository.serve_mode(), "Repository is servable");
            Ok(())
        }
        ServeMode::Disabled => Err(GateError::transport_disabled(callsign)),
        unhandled => {
            warn!(%callsign, serve_mode = ?unhandled, "Unhandled serve mode, refusing access");
            Err(GateError::transport_disabled(callsign))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use gatehouse_core::VcsKind;

    fn repository(setting: &str) -> RepositoryRecord {
        RepositoryRecord::new("R".parse().unwrap(), VcsKind::Git, setting)
    }

    #[test]
    fn test_disabled_is_refused() {
        assert_matches!(
            check_servable(&repository("off")),
            Err(GateError::TransportDisabled { callsign }) if callsign == "R"
        );
    }

    #[test]
    fn test_read_only_and_read_write_are_admitted() {
        assert!(check_servable(&repository("readonly")).is_ok());
        assert!(check_servable(&repository("readwrite")).is_ok());
    }

    #[test]
    fn test_unknown_setting_is_refused() {
        assert_matches!(
            check_servable(&repository("sometimes")),
            Err(GateError::TransportDisabled { .. })
        );
    }
}
