//! Path and repository resolution

use gatehouse_core::{
    Callsign, GateError, GateResult, RepositoryDirectory, RepositoryRecord, ViewerId,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

/// Shape of an accepted repository path
pub const REPOSITORY_PATH_PATTERN: &str = "^/?diffusion/(?P<callsign>[A-Z]+)(?:/|$)";

#[allow(clippy::expect_used)] // constant pattern, covered by the tests below
static REPOSITORY_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(REPOSITORY_PATH_PATTERN).expect("repository path pattern compiles"));

/// Extract the callsign from a transport request path
///
/// Accepts an optional leading `/`, the literal segment `diffusion/`, one or
/// more uppercase ASCII letters, then either `/` or the end of the path.
/// Anything after that `/` is ignored.
pub fn resolve_callsign(path: &str) -> GateResult<Callsign> {
    REPOSITORY_PATH
        .captures(path)
        .and_then(|captures| captures.name("callsign"))
        .and_then(|callsign| callsign.as_str().parse().ok())
        .ok_or_else(|| {
            debug!(path, pattern = REPOSITORY_PATH_PATTERN, "Request path does not name a repository");
            GateError::malformed_path(path)
        })
}

/// Resolve `callsign` to a repository visible to `viewer`
///
/// Visibility is applied by the directory; a hidden repository and a missing
/// one are both reported as not found.
pub fn resolve_repository<D>(
    directory: &D,
    viewer: &ViewerId,
    callsign: &Callsign,
) -> GateResult<Arc<RepositoryRecord>>
where
    D: RepositoryDirectory + ?Sized,
{
    let repository = directory
        .find_by_callsign(viewer, callsign)
        .ok_or_else(|| GateError::not_found(callsign))?;
    debug!(%callsign, %viewer, serve_mode = %repository.serve_mode(), "Resolved repository");
    Ok(repository)
}
