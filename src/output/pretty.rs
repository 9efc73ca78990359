//! Deferred pretty-printing. Formatting is left to the host, which can
//! only format what is in front of the user; a result document opened in
//! the background gets formatted the next time it gains focus.

use tracing::debug;

use crate::config::Settings;
use crate::host::{Host, HostError, ViewerId};

/// Decide, for a freshly shown viewer, whether formatting happens now or
/// is deferred. Returns true if it was deferred. The viewer is scrolled to
/// the top either way, even when formatting fails.
pub fn schedule(
    host: &mut dyn Host,
    settings: &Settings,
    viewer: ViewerId,
) -> Result<bool, HostError> {
    let mut deferred = false;
    let mut formatted = Ok(None);

    if settings.response_view_pretty_print {
        if host.active_viewer() == Some(viewer) {
            formatted = host.format_document(viewer);
            debug!(%viewer, result = ?formatted, "Formatted immediately");
        } else {
            debug!(%viewer, "Formatting deferred until focused");
            deferred = true;
        }
    }

    host.reveal_top(viewer);
    formatted?;
    Ok(deferred)
}

/// Format a viewer whose formatting was deferred, now that it has focus.
/// An indeterminate answer from the host counts as formatted, so that
/// formatting is attempted at most once.
pub fn apply(host: &mut dyn Host, settings: &Settings, viewer: ViewerId) -> Result<bool, HostError> {
    if !settings.response_view_pretty_print {
        return Ok(false);
    }

    let result = host.format_document(viewer);
    host.reveal_top(viewer);
    let result = result?;

    debug!(%viewer, ?result, "Applied deferred formatting");
    Ok(result.unwrap_or(true))
}
