//! Side effects requested from the host.
//!
//! Controllers never touch the DOM or the network directly. Event handlers
//! return a list of actions and the host carries them out (call
//! `preventDefault`, re-render, dispatch a batch to the store).

use crate::tile::TileUpdate;
use crate::viewport::Viewport;

/// A side effect returned by an event handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Suppress the browser's default handling of the native event.
    PreventDefault,
    /// Visual state changed; redraw.
    RenderNeeded,
    /// The selection set was replaced by a new instance.
    SelectionChanged,
    /// Send one batch of position updates to the tile store.
    CommitMoves(Vec<TileUpdate>),
    /// The committed viewport changed (and was persisted).
    ViewportCommitted(Viewport),
}
