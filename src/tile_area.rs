//! Tile area controller: rubber-band selection and grouped drag-move.
//!
//! DESIGN
//! ======
//! Two independent [`DragGesture`]s share one pointer stream:
//!
//! - the tile gesture, pressed when the pointer lands on a tile. It claims
//!   the event first, so the enclosing background never sees that press;
//! - the area gesture, pressed on empty background, which drives the
//!   rubber-band rectangle.
//!
//! The container frame (window origin of the canvas plus its scale) is
//! captured once at press time and reused for every move of that press.
//!
//! Local render state is the mirrored [`TileDoc`] plus the in-flight drag
//! delta. The drag never writes into the doc; release produces one
//! [`Action::CommitMoves`] batch of snapped updates. [`crate::surface::Surface`]
//! folds that batch into the doc at once through [`TileArea::apply_updates`],
//! and the next [`TileArea::sync`] from the store reconciles it.

#[cfg(test)]
#[path = "tile_area_test.rs"]
mod tile_area_test;

use tracing::debug;

use crate::action::Action;
use crate::config::SurfaceConfig;
use crate::drag::{DragGesture, Release};
use crate::input::{ButtonMask, Modifiers, PointerInput};
use crate::render::{self, TileView, stacking_order};
use crate::selection::Selection;
use crate::tile::{NewTile, SurfaceId, Tile, TileDoc, TileId, TilePatch, TileUpdate};
use crate::vec::{Canvas, CanvasVec, ContainerFrame, Rect, WindowVec, round_to};

/// Selection and drag-move controller for the tiles of one surface.
pub struct TileArea {
    surface_id: SurfaceId,
    config: SurfaceConfig,
    doc: TileDoc,
    selection: Selection<TileId>,
    area_drag: DragGesture,
    tile_drag: DragGesture,
    /// Captured at press time for whichever gesture is active.
    frame: ContainerFrame,
    /// Modifiers held when the area gesture was pressed.
    press_modifiers: Modifiers,
    selection_rect: Option<Rect<Canvas>>,
}

impl TileArea {
    #[must_use]
    pub fn new(surface_id: SurfaceId, config: SurfaceConfig) -> Self {
        Self {
            surface_id,
            config,
            doc: TileDoc::new(),
            selection: Selection::new(),
            area_drag: DragGesture::with_threshold(ButtonMask::PRIMARY, config.drag_threshold),
            tile_drag: DragGesture::with_threshold(ButtonMask::PRIMARY, config.drag_threshold),
            frame: ContainerFrame::default(),
            press_modifiers: Modifiers::NONE,
            selection_rect: None,
        }
    }

    #[must_use]
    pub fn surface_id(&self) -> SurfaceId {
        self.surface_id
    }

    #[must_use]
    pub fn doc(&self) -> &TileDoc {
        &self.doc
    }

    #[must_use]
    pub fn selection(&self) -> &Selection<TileId> {
        &self.selection
    }

    /// The rubber-band rectangle in canvas units, while an area drag is live.
    #[must_use]
    pub fn selection_rect(&self) -> Option<Rect<Canvas>> {
        self.selection_rect
    }

    #[must_use]
    pub fn is_moving_tiles(&self) -> bool {
        self.tile_drag.is_dragging()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.tile_drag.is_active() || self.area_drag.is_active()
    }

    /// Buttons that may start a rubber band. `ButtonMask::NONE` disables it.
    pub fn set_area_select_buttons(&mut self, buttons: ButtonMask) {
        self.area_drag.set_buttons(buttons);
    }

    /// Uncommitted tile-drag offset in canvas units.
    #[must_use]
    pub fn live_delta(&self) -> CanvasVec {
        if self.tile_drag.is_dragging() {
            self.frame.window_delta_to_canvas(self.tile_drag.delta())
        } else {
            CanvasVec::zero()
        }
    }

    #[must_use]
    pub fn tile_views(&self) -> Vec<TileView> {
        render::tile_views(&self.doc, &self.selection, self.live_delta(), self.tile_drag.is_dragging())
    }

    // =========================================================================
    // STORE STATE
    // =========================================================================

    /// Replace the mirror with a fresh listing. Selected ids that vanished are dropped.
    pub fn sync(&mut self, tiles: Vec<Tile>) -> Vec<Action> {
        self.doc.load_snapshot(tiles);
        let mut actions = vec![Action::RenderNeeded];
        if self.prune_selection() {
            actions.push(Action::SelectionChanged);
        }
        actions
    }

    /// Fold a batch of updates into the mirror, snapping positions to the grid.
    /// Updates for unknown ids are ignored.
    pub fn apply_updates(&mut self, updates: &[TileUpdate]) {
        for update in updates {
            let patch = update.patch.snapped(self.config.grid_size);
            if !self.doc.apply_patch(&update.id, &patch) {
                debug!(id = %update.id, "update for unknown tile ignored");
            }
        }
    }

    /// Insert or replace one confirmed tile.
    pub fn upsert_tile(&mut self, tile: Tile) {
        self.doc.upsert(tile);
    }

    /// Drop tiles from the mirror (and from the selection).
    pub fn remove_tiles(&mut self, ids: &[TileId]) -> Vec<Action> {
        for id in ids {
            self.doc.remove(id);
        }
        let mut actions = vec![Action::RenderNeeded];
        if self.prune_selection() {
            actions.push(Action::SelectionChanged);
        }
        actions
    }

    fn prune_selection(&mut self) -> bool {
        let stale = self.selection.iter().any(|id| !self.doc.contains(id));
        if stale {
            let doc = &self.doc;
            self.selection.retain(|id| doc.contains(id));
        }
        stale
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    pub fn select_all(&mut self) -> Vec<Action> {
        self.selection.select_all(self.doc.ids());
        vec![Action::SelectionChanged, Action::RenderNeeded]
    }

    pub fn clear_selection(&mut self) -> Vec<Action> {
        self.selection.clear();
        vec![Action::SelectionChanged, Action::RenderNeeded]
    }

    /// Clear the selection and return the ids to delete, in document order.
    pub fn delete_selected(&mut self) -> Vec<TileId> {
        let ids: Vec<TileId> = self.doc.ids().filter(|id| self.selection.is_selected(id)).collect();
        self.selection.clear();
        ids
    }

    /// Creation fields for a tile dropped at `drop_at`, snapped to the grid.
    #[must_use]
    pub fn place_tile(&self, asset_ref: Option<String>, drop_at: WindowVec, size: CanvasVec, frame: ContainerFrame) -> NewTile {
        let position = frame.window_to_canvas(drop_at);
        NewTile {
            surface_id: self.surface_id,
            left: position.x,
            top: position.y,
            width: size.x,
            height: size.y,
            asset_ref,
        }
        .snapped(self.config.grid_size)
    }

    // =========================================================================
    // POINTER EVENTS
    // =========================================================================

    /// Route a press: the tile under the pointer (if any) first, then the background.
    pub fn pointer_down(&mut self, event: &mut PointerInput, hit: Option<TileId>, frame: ContainerFrame) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(id) = hit {
            self.press_tile(event, id, frame, &mut actions);
        }
        self.press_background(event, frame);
        actions
    }

    fn press_tile(&mut self, event: &mut PointerInput, id: TileId, frame: ContainerFrame, actions: &mut Vec<Action>) {
        if !self.doc.contains(&id) {
            return;
        }
        // Toggling a tile out leaves nothing under the pointer to drag.
        if event.modifiers.is_toggle() && self.selection.is_selected(&id) {
            if self.tile_drag.claim(event) {
                self.selection.toggle(id);
                actions.push(Action::SelectionChanged);
                actions.push(Action::RenderNeeded);
            }
            return;
        }
        if !self.tile_drag.press(event) {
            return;
        }
        self.frame = frame;
        if event.modifiers.is_toggle() {
            self.selection.toggle(id);
        } else if self.selection.is_selected(&id) {
            return;
        } else {
            self.selection.replace([id]);
        }
        actions.push(Action::SelectionChanged);
        actions.push(Action::RenderNeeded);
    }

    fn press_background(&mut self, event: &mut PointerInput, frame: ContainerFrame) {
        if !self.area_drag.press(event) {
            return;
        }
        self.frame = frame;
        self.press_modifiers = event.modifiers;
        self.selection_rect = None;
    }

    pub fn pointer_move(&mut self, position: WindowVec) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.tile_drag.is_active() && self.tile_drag.pointer_move(position) {
            actions.push(Action::PreventDefault);
            actions.push(Action::RenderNeeded);
        }
        if self.area_drag.is_active() && self.area_drag.pointer_move(position) {
            self.update_rubber_band();
            actions.push(Action::PreventDefault);
            actions.push(Action::SelectionChanged);
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn update_rubber_band(&mut self) {
        let state = self.area_drag.state();
        let rect = Rect::from_corners(self.frame.window_to_canvas(state.start), self.frame.window_to_canvas(state.end));
        let hits: Vec<TileId> = self.doc.iter().filter(|t| t.rect().intersects(&rect)).map(|t| t.id).collect();
        self.selection.replace(hits);
        self.selection_rect = Some(rect);
    }

    /// Finish whichever press is active. `now_ms` stamps committed moves.
    pub fn pointer_up(&mut self, position: WindowVec, now_ms: i64) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Release::Dragged(end) = self.tile_drag.release(position) {
            let delta = self.frame.window_delta_to_canvas(end.delta);
            let updates = self.build_commit(delta, now_ms);
            actions.push(Action::RenderNeeded);
            if !updates.is_empty() {
                actions.push(Action::CommitMoves(updates));
            }
        }
        match self.area_drag.release(position) {
            Release::Dragged(_) => {
                self.selection_rect = None;
                actions.push(Action::RenderNeeded);
            }
            Release::Click { .. } if !self.press_modifiers.any() => {
                self.selection.clear();
                actions.push(Action::SelectionChanged);
                actions.push(Action::RenderNeeded);
            }
            Release::Click { .. } | Release::Ignored => {}
        }
        actions
    }

    /// Abort any press without committing.
    pub fn cancel(&mut self) -> Vec<Action> {
        let tile = self.tile_drag.cancel();
        let area = self.area_drag.cancel();
        self.selection_rect = None;
        if tile || area { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    /// One update per selected tile still present locally, ordered by current
    /// stacking so the batch preserves the pre-move relative order.
    fn build_commit(&self, delta: CanvasVec, now_ms: i64) -> Vec<TileUpdate> {
        let tiles = self.doc.as_slice();
        let updates: Vec<TileUpdate> = stacking_order(tiles, |t| self.selection.is_selected(&t.id))
            .into_iter()
            .map(|index| &tiles[index])
            .filter(|tile| self.selection.is_selected(&tile.id))
            .zip(0u32..)
            .map(|(tile, order)| {
                let position = round_to(tile.position() + delta, self.config.grid_size);
                TileUpdate {
                    id: tile.id,
                    patch: TilePatch {
                        left: Some(position.x),
                        top: Some(position.y),
                        last_moved_at: Some(now_ms),
                        order: Some(order),
                        ..TilePatch::default()
                    },
                }
            })
            .collect();
        let skipped = self.selection.len().saturating_sub(updates.len());
        if skipped > 0 {
            debug!(skipped, "selected tiles no longer present; skipping their move");
        }
        debug!(count = updates.len(), "tile move batch built");
        updates
    }
}
