//! Structured events for the record store lifecycle.
//!
//! Every helper emits one `info!` event tagged with an `event` field, so the
//! JSON output of [`crate::telemetry::init_tracing`] can be filtered on it.
//! Verbosity follows `RUST_LOG`.

use std::path::Path;

use tracing::info;

/// RAII guard entering a span tagged with the run id being worked on.
///
/// ```ignore
/// let _span = RunSpan::enter("6e2121d4");
/// // events emitted here carry run_id = "6e2121d4"
/// ```
pub struct RunSpan {
    _span: tracing::span::EnteredSpan,
}

impl RunSpan {
    pub fn enter(run_id: &str) -> Self {
        let span = tracing::info_span!("runvault.run", run_id = %run_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: store loaded from `root`.
pub fn emit_store_opened(root: &Path, runs: usize) {
    info!(event = "store.opened", root = %root.display(), runs = runs);
}

/// Emit event: a query narrowed `total` runs down to `matched`.
pub fn emit_query_finished(total: usize, matched: usize) {
    info!(event = "query.finished", total = total, matched = matched);
}

/// Emit event: run moved into the ended directory.
pub fn emit_run_discarded(run_id: &str, path: &Path) {
    info!(event = "run.discarded", run_id = %run_id, path = %path.display());
}

/// Emit event: an earlier save and its history were moved under `target`.
pub fn emit_restore_resolved(run_id: &str, moved: usize, target: &Path) {
    info!(
        event = "restore.resolved",
        run_id = %run_id,
        moved = moved,
        target = %target.display(),
    );
}

/// Emit event: run written and registered.
pub fn emit_run_saved(run_id: &str, path: &Path, history: usize) {
    info!(
        event = "run.saved",
        run_id = %run_id,
        path = %path.display(),
        history = history,
    );
}
