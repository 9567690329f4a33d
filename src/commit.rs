//! Dispatch of gesture results to the tile store.
//!
//! These run after the gesture has already updated local state. Failures go
//! to the notifier and are otherwise dropped: nothing is retried and nothing
//! is rolled back, since the next listing from the store reconciles.

#[cfg(test)]
#[path = "commit_test.rs"]
mod commit_test;

use tracing::{debug, warn};

use crate::notify::Notifier;
use crate::store::{RemoveReport, StoreError, TileStore};
use crate::tile::{TileId, TileUpdate};

/// Send one drag-move batch.
///
/// # Errors
///
/// Returns the store error after it has been reported through `notifier`.
pub async fn commit_moves(store: &dyn TileStore, notifier: &dyn Notifier, updates: Vec<TileUpdate>) -> Result<(), StoreError> {
    if updates.is_empty() {
        return Ok(());
    }
    let count = updates.len();
    debug!(count, "dispatching tile move batch");
    match store.update_many(updates).await {
        Ok(()) => Ok(()),
        Err(e) => {
            warn!(count, code = e.error_code(), error = %e, "tile move batch failed");
            notifier.error(&format!("Failed to move tiles: {e}"));
            Err(e)
        }
    }
}

/// Delete tiles, reporting each per-id failure and the overall success.
///
/// # Errors
///
/// Returns the store error when the whole request failed; it has already
/// been reported through `notifier`.
pub async fn remove_tiles(store: &dyn TileStore, notifier: &dyn Notifier, ids: Vec<TileId>) -> Result<RemoveReport, StoreError> {
    if ids.is_empty() {
        return Ok(RemoveReport::default());
    }
    let report = match store.remove_many(ids).await {
        Ok(report) => report,
        Err(e) => {
            warn!(code = e.error_code(), error = %e, "tile delete failed");
            notifier.error(&format!("Failed to delete tiles: {e}"));
            return Err(e);
        }
    };
    for message in &report.errors {
        notifier.error(message);
    }
    match report.removed.len() {
        0 => {}
        1 => notifier.success("Deleted 1 tile"),
        n => notifier.success(&format!("Deleted {n} tiles")),
    }
    Ok(report)
}
