//! Surface: one rendered map, composing the viewport and the tile area.
//!
//! SYSTEM CONTEXT
//! ==============
//! The host forwards raw window events here and carries out the returned
//! [`Action`]s. A press is offered to handlers in DOM bubble order: the tile
//! under the pointer, then the tile-area background, then the viewport. The
//! first gesture that accepts it claims the event, so the outer ones skip it.
//! Move, release and cancel go to every gesture; only an active one reacts.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::rc::Rc;

use tracing::debug;

use crate::action::Action;
use crate::config::SurfaceConfig;
use crate::input::{ButtonMask, PointerInput, WheelDelta};
use crate::render::TileView;
use crate::storage::KeyValueStore;
use crate::tile::{NewTile, SurfaceId, TileId};
use crate::tile_area::TileArea;
use crate::vec::{CanvasVec, ContainerFrame, WindowVec};
use crate::viewport::{PAN_BUTTONS, ViewportController};

/// Key that aborts any in-flight gesture.
pub const CANCEL_KEY: &str = "Escape";

pub struct Surface {
    viewport: ViewportController,
    tiles: TileArea,
    pan_mode: bool,
}

impl Surface {
    /// Build a surface view. The viewport is restored from `storage` under `view_key`.
    #[must_use]
    pub fn new(
        surface_id: SurfaceId,
        config: SurfaceConfig,
        window_size: WindowVec,
        storage: Rc<dyn KeyValueStore>,
        view_key: &str,
    ) -> Self {
        Self {
            viewport: ViewportController::new(config, window_size, storage, view_key),
            tiles: TileArea::new(surface_id, config),
            pan_mode: false,
        }
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    #[must_use]
    pub fn tiles(&self) -> &TileArea {
        &self.tiles
    }

    /// Direct access for store-sync calls (`sync`, `upsert_tile`, `remove_tiles`).
    pub fn tiles_mut(&mut self) -> &mut TileArea {
        &mut self.tiles
    }

    /// Placement of the tile container in the window as currently drawn.
    #[must_use]
    pub fn frame(&self) -> ContainerFrame {
        self.viewport.frame()
    }

    #[must_use]
    pub fn tile_views(&self) -> Vec<TileView> {
        self.tiles.tile_views()
    }

    #[must_use]
    pub fn pan_mode(&self) -> bool {
        self.pan_mode
    }

    /// In pan mode the primary button pans too and rubber-band selection is off.
    pub fn set_pan_mode(&mut self, enabled: bool) {
        self.pan_mode = enabled;
        if enabled {
            self.viewport.set_pan_buttons(ButtonMask::ALL);
            self.tiles.set_area_select_buttons(ButtonMask::NONE);
        } else {
            self.viewport.set_pan_buttons(PAN_BUTTONS);
            self.tiles.set_area_select_buttons(ButtonMask::PRIMARY);
        }
    }

    pub fn set_window_size(&mut self, window_size: WindowVec) -> Vec<Action> {
        self.viewport.set_window_size(window_size);
        vec![Action::ViewportCommitted(self.viewport.viewport()), Action::RenderNeeded]
    }

    /// Creation fields for an asset dropped at `drop_at`.
    #[must_use]
    pub fn place_tile(&self, asset_ref: Option<String>, drop_at: WindowVec, size: CanvasVec) -> NewTile {
        self.tiles.place_tile(asset_ref, drop_at, size, self.frame())
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// `hit` is the tile under the pointer, if the host's hit test found one.
    pub fn on_pointer_down(&mut self, mut event: PointerInput, hit: Option<TileId>) -> Vec<Action> {
        let frame = self.frame();
        let mut actions = self.tiles.pointer_down(&mut event, hit, frame);
        self.viewport.pointer_down(&mut event);
        if event.default_prevented() {
            push_unique(&mut actions, Action::PreventDefault);
        }
        actions
    }

    pub fn on_pointer_move(&mut self, position: WindowVec) -> Vec<Action> {
        let mut actions = self.tiles.pointer_move(position);
        if self.viewport.pointer_move(position) {
            push_unique(&mut actions, Action::PreventDefault);
            push_unique(&mut actions, Action::RenderNeeded);
        }
        actions
    }

    /// Finish the active gesture. A tile move is folded into the local mirror
    /// straight away and also returned for dispatch to the store.
    pub fn on_pointer_up(&mut self, position: WindowVec, now_ms: i64) -> Vec<Action> {
        let mut actions = Vec::new();
        for action in self.tiles.pointer_up(position, now_ms) {
            if let Action::CommitMoves(updates) = &action {
                self.tiles.apply_updates(updates);
            }
            push_unique(&mut actions, action);
        }
        if self.viewport.pointer_up(position) {
            push_unique(&mut actions, Action::ViewportCommitted(self.viewport.viewport()));
            push_unique(&mut actions, Action::RenderNeeded);
        }
        actions
    }

    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        let mut actions = self.tiles.cancel();
        if self.viewport.pointer_cancel() {
            push_unique(&mut actions, Action::RenderNeeded);
        }
        actions
    }

    /// Escape aborts exactly like pointer-cancel; other keys are ignored.
    pub fn on_key_down(&mut self, key: &str) -> Vec<Action> {
        if key != CANCEL_KEY {
            return Vec::new();
        }
        debug!("gesture aborted by key");
        self.on_pointer_cancel()
    }

    /// Native scrolling is always suppressed over the surface.
    pub fn on_wheel(&mut self, cursor: WindowVec, delta: WheelDelta) -> Vec<Action> {
        let mut actions = vec![Action::PreventDefault];
        if self.viewport.wheel(cursor, delta) {
            actions.push(Action::ViewportCommitted(self.viewport.viewport()));
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// A `contextmenu` event: swallowed once after a right-button pan.
    pub fn on_context_menu(&mut self) -> Vec<Action> {
        if self.viewport.context_menu() { vec![Action::PreventDefault] } else { Vec::new() }
    }
}

fn push_unique(actions: &mut Vec<Action>, action: Action) {
    if !actions.contains(&action) {
        actions.push(action);
    }
}
