//! Tile model: positioned rectangles on a surface and the local mirror of the
//! store's confirmed state.
//!
//! `Tile` is the persisted record. `TilePatch` is a sparse update (only
//! present fields apply), `TileUpdate` pairs a patch with its target, and
//! `TileDoc` holds the tiles of one surface in the order the store listed
//! them. That order is the render order of elements and never changes on
//! restack; stacking is expressed with z-indices (see `render`).

#[cfg(test)]
#[path = "tile_test.rs"]
mod tile_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::vec::{Canvas, CanvasVec, Rect, round_scalar_to};

/// Unique identifier for a tile.
pub type TileId = Uuid;

/// Unique identifier for a surface (a map within a room).
pub type SurfaceId = Uuid;

/// A tile as stored and as sent over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    /// The surface this tile belongs to.
    pub surface_id: SurfaceId,
    /// Left edge in canvas units; a grid multiple once committed.
    pub left: f64,
    /// Top edge in canvas units; a grid multiple once committed.
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Uploaded image backing this tile, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_ref: Option<String>,
    /// Milliseconds since the Unix epoch of the last drag-move commit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_moved_at: Option<i64>,
    /// Position within the batch that last moved this tile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl Tile {
    #[must_use]
    pub fn position(&self) -> CanvasVec {
        CanvasVec::new(self.left, self.top)
    }

    #[must_use]
    pub fn size(&self) -> CanvasVec {
        CanvasVec::new(self.width, self.height)
    }

    #[must_use]
    pub fn rect(&self) -> Rect<Canvas> {
        Rect::from_origin_size(self.position(), self.size())
    }

    /// The larger of width and height.
    #[must_use]
    pub fn max_dimension(&self) -> f64 {
        self.width.max(self.height)
    }
}

/// Fields for creating a tile; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTile {
    pub surface_id: SurfaceId,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_ref: Option<String>,
}

impl NewTile {
    /// Copy with `left`/`top` snapped to `grid`.
    #[must_use]
    pub fn snapped(&self, grid: f64) -> Self {
        Self {
            left: round_scalar_to(self.left, grid),
            top: round_scalar_to(self.top, grid),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn into_tile(self, id: TileId) -> Tile {
        Tile {
            id,
            surface_id: self.surface_id,
            left: self.left,
            top: self.top,
            width: self.width,
            height: self.height,
            asset_ref: self.asset_ref,
            last_moved_at: None,
            order: None,
        }
    }
}

/// Sparse update for a tile. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_moved_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl TilePatch {
    /// Copy with any present `left`/`top` snapped to `grid`.
    #[must_use]
    pub fn snapped(&self, grid: f64) -> Self {
        Self {
            left: self.left.map(|v| round_scalar_to(v, grid)),
            top: self.top.map(|v| round_scalar_to(v, grid)),
            ..self.clone()
        }
    }

    /// Write every present field into `tile`.
    pub fn apply_to(&self, tile: &mut Tile) {
        if let Some(left) = self.left {
            tile.left = left;
        }
        if let Some(top) = self.top {
            tile.top = top;
        }
        if let Some(width) = self.width {
            tile.width = width;
        }
        if let Some(height) = self.height {
            tile.height = height;
        }
        if let Some(at) = self.last_moved_at {
            tile.last_moved_at = Some(at);
        }
        if let Some(order) = self.order {
            tile.order = Some(order);
        }
    }
}

/// One entry of a batch update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileUpdate {
    pub id: TileId,
    pub patch: TilePatch,
}

/// Local mirror of one surface's confirmed tiles.
#[derive(Debug, Clone, Default)]
pub struct TileDoc {
    tiles: Vec<Tile>,
}

impl TileDoc {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all tiles with a fresh listing from the store.
    pub fn load_snapshot(&mut self, tiles: Vec<Tile>) {
        self.tiles = tiles;
    }

    /// Insert a tile, replacing any existing tile with the same id in place.
    pub fn upsert(&mut self, tile: Tile) {
        match self.tiles.iter_mut().find(|t| t.id == tile.id) {
            Some(existing) => *existing = tile,
            None => self.tiles.push(tile),
        }
    }

    /// Remove a tile by id, returning it if it was present.
    pub fn remove(&mut self, id: &TileId) -> Option<Tile> {
        let index = self.tiles.iter().position(|t| t.id == *id)?;
        Some(self.tiles.remove(index))
    }

    #[must_use]
    pub fn get(&self, id: &TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == *id)
    }

    #[must_use]
    pub fn contains(&self, id: &TileId) -> bool {
        self.get(id).is_some()
    }

    /// Apply a patch. Returns `false` if the tile doesn't exist.
    pub fn apply_patch(&mut self, id: &TileId, patch: &TilePatch) -> bool {
        let Some(tile) = self.tiles.iter_mut().find(|t| t.id == *id) else {
            return false;
        };
        patch.apply_to(tile);
        true
    }

    /// Tiles in listing order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.iter().map(|t| t.id)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Tile] {
        &self.tiles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
