//! Write-access authorizer
//!
//! Evaluated lazily, the first time an operation attempts a write. The push
//! capability is queried at most once per session; the verdict is cached on
//! the session and replayed for every later call.

use crate::session::{Session, WriteAccess};
use gatehouse_core::{Capability, CapabilityPolicy, GateError, GateResult, ServeMode};
use tracing::{debug, info, warn};

/// Ensure the session's viewer may write to the session's repository
///
/// 1. A cached grant returns immediately; a cached denial fails immediately.
/// 2. The repository's serve mode is re-read: `Disabled` fails
///    `TransportDisabled`, `ReadOnly` fails `ReadOnlyTransport`.
/// 3. `ReadWrite` queries `policy` for [`Capability::PUSH`] and caches the
///    verdict.
///
/// Any serve mode not listed fails `TransportDisabled`.
pub fn ensure_write_access<P>(session: &mut Session, policy: &P) -> GateResult<()>
where
    P: CapabilityPolicy + ?Sized,
{
    let repository = match session.repository() {
        Some(repository) => repository.clone(),
        None => {
            return Err(GateError::operation_failed(
                "Write access requested before a repository was resolved.",
            ))
        }
    };
    let callsign = repository.callsign();

    match session.write_access() {
        WriteAccess::Granted => return Ok(()),
        WriteAccess::Denied => {
            return Err(GateError::permission_denied(session.viewer(), callsign));
        }
        WriteAccess::Unknown => {}
    }

    match repository.serve_mode() {
        ServeMode::ReadWrite => {
            let viewer = session.viewer().clone();
            if policy.has_capability(&viewer, &repository, Capability::PUSH) {
                debug!(%viewer, %callsign, "Write access granted");
                session.record_write_access(WriteAccess::Granted);
                Ok(())
            } else {
                info!(%viewer, %callsign, "Write access denied by policy");
                session.record_write_access(WriteAccess::Denied);
                Err(GateError::permission_denied(&viewer, callsign))
            }
        }
        ServeMode::ReadOnly => {
            info!(viewer = %session.viewer(), %callsign, "Write attempted on read-only repository");
            Err(GateError::read_only_transport(callsign))
        }
        ServeMode::Disabled => {
            warn!(%callsign, "Write attempted on a repository that is not servable");
            Err(GateError::transport_disabled(callsign))
        }
        unhandled => {
            warn!(%callsign, serve_mode = ?unhandled, "Unhandled serve mode, refusing write");
            Err(GateError::transport_disabled(callsign))
        }
    }
}
