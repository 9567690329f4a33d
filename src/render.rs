//! Rendering contract: stacking order and per-tile views.
//!
//! Tiles are never reordered in the render tree. Each view keeps the tile id
//! as its stable key and carries an integer z-index instead, so moving or
//! selecting one tile does not interrupt anyone's in-flight position
//! transition.
//!
//! Stacking key, compared lexicographically, ascending (later = on top):
//!
//! 1. `-max(width, height)`: bigger tiles sit behind smaller ones.
//! 2. `1` for a selected tile while a tile drag is in progress, else `0`.
//! 3. `last_moved_at`, absent as `0`.
//! 4. `order` within the commit batch, absent as `0`.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::cmp::Ordering;

use serde::Serialize;

use crate::selection::Selection;
use crate::tile::{Tile, TileDoc, TileId};
use crate::vec::CanvasVec;

/// Composite stacking key for one tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackKey {
    pub neg_size: f64,
    pub lifted: u8,
    pub last_moved_at: i64,
    pub order: u32,
}

impl StackKey {
    #[must_use]
    pub fn for_tile(tile: &Tile, lifted: bool) -> Self {
        Self {
            neg_size: -tile.max_dimension(),
            lifted: u8::from(lifted),
            last_moved_at: tile.last_moved_at.unwrap_or(0),
            order: tile.order.unwrap_or(0),
        }
    }

    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.neg_size
            .total_cmp(&other.neg_size)
            .then(self.lifted.cmp(&other.lifted))
            .then(self.last_moved_at.cmp(&other.last_moved_at))
            .then(self.order.cmp(&other.order))
    }
}

/// Indices into `tiles`, bottom of the stack first.
///
/// `lifted` reports whether a tile is being drag-moved. The sort is stable,
/// so tiles with equal keys keep their listing order.
#[must_use]
pub fn stacking_order<F>(tiles: &[Tile], lifted: F) -> Vec<usize>
where
    F: Fn(&Tile) -> bool,
{
    let keys: Vec<StackKey> = tiles.iter().map(|t| StackKey::for_tile(t, lifted(t))).collect();
    let mut indices: Vec<usize> = (0..tiles.len()).collect();
    indices.sort_by(|&a, &b| keys[a].compare(&keys[b]));
    indices
}

/// z-index for each tile, aligned with `tiles` (`0..n-1`).
#[must_use]
pub fn z_indices<F>(tiles: &[Tile], lifted: F) -> Vec<u32>
where
    F: Fn(&Tile) -> bool,
{
    let mut z = vec![0u32; tiles.len()];
    for (rank, index) in (0u32..).zip(stacking_order(tiles, lifted)) {
        z[index] = rank;
    }
    z
}

/// What the host draws for one tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileView {
    /// Stable element key; never changes across reorders.
    pub key: TileId,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub z_index: u32,
    pub selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_ref: Option<String>,
}

/// Project the confirmed tiles plus the live drag delta into views.
///
/// Views come back in document order. While `dragging` is set every selected
/// tile is shifted by `live_delta` (uncommitted, unsnapped).
#[must_use]
pub fn tile_views(doc: &TileDoc, selection: &Selection<TileId>, live_delta: CanvasVec, dragging: bool) -> Vec<TileView> {
    let tiles = doc.as_slice();
    let lifted = |t: &Tile| dragging && selection.is_selected(&t.id);
    let z = z_indices(tiles, lifted);
    tiles
        .iter()
        .zip(z)
        .map(|(tile, z_index)| {
            let position = if lifted(tile) { tile.position() + live_delta } else { tile.position() };
            TileView {
                key: tile.id,
                left: position.x,
                top: position.y,
                width: tile.width,
                height: tile.height,
                z_index,
                selected: selection.is_selected(&tile.id),
                asset_ref: tile.asset_ref.clone(),
            }
        })
        .collect()
}
