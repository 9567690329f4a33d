//! Tile persistence boundary.
//!
//! [`TileStore`] is the contract the surface talks to; the real backend is a
//! remote service. [`MemoryTileStore`] is an authoritative in-process
//! implementation used by hosts without a backend and by tests. Like any
//! authoritative store it does not trust client rounding: `left`/`top` are
//! snapped to the grid on every create and update.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::RefCell;
use std::collections::HashSet;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::consts::GRID_SIZE;
use crate::tile::{NewTile, SurfaceId, Tile, TileId, TileUpdate};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("tile not found: {0}")]
    NotFound(TileId),
    #[error("surface not found: {0}")]
    SurfaceNotFound(SurfaceId),
    #[error("invalid tile geometry")]
    InvalidGeometry,
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_TILE_NOT_FOUND",
            Self::SurfaceNotFound(_) => "E_SURFACE_NOT_FOUND",
            Self::InvalidGeometry => "E_INVALID_GEOMETRY",
            Self::Backend(_) => "E_BACKEND",
        }
    }
}

/// Outcome of a batch delete. Every id is attempted; failures are collected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveReport {
    pub removed: Vec<TileId>,
    pub errors: Vec<String>,
}

/// Tile persistence operations used by the surface.
///
/// Single-threaded: futures need not be `Send`.
#[async_trait(?Send)]
pub trait TileStore {
    /// Tiles of one surface, in stable listing order.
    async fn list(&self, surface_id: SurfaceId) -> Result<Vec<Tile>, StoreError>;

    /// Create a tile and return its id.
    async fn create(&self, fields: NewTile) -> Result<TileId, StoreError>;

    /// Apply a batch of sparse patches. A patch for a tile that no longer
    /// exists is a no-op, not an error.
    async fn update_many(&self, updates: Vec<TileUpdate>) -> Result<(), StoreError>;

    /// Delete tiles one by one, collecting per-id failures.
    async fn remove_many(&self, ids: Vec<TileId>) -> Result<RemoveReport, StoreError>;
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// Authoritative in-memory tile store.
pub struct MemoryTileStore {
    grid_size: f64,
    surfaces: RefCell<HashSet<SurfaceId>>,
    tiles: RefCell<Vec<Tile>>,
}

impl Default for MemoryTileStore {
    fn default() -> Self {
        Self::new(GRID_SIZE)
    }
}

impl MemoryTileStore {
    #[must_use]
    pub fn new(grid_size: f64) -> Self {
        Self { grid_size, surfaces: RefCell::new(HashSet::new()), tiles: RefCell::new(Vec::new()) }
    }

    /// Register a surface so tiles can be created on it.
    pub fn add_surface(&self, surface_id: SurfaceId) {
        self.surfaces.borrow_mut().insert(surface_id);
    }

    /// Delete a surface and every tile on it. Returns the number of tiles removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SurfaceNotFound`] for an unknown surface.
    pub fn remove_surface(&self, surface_id: SurfaceId) -> Result<usize, StoreError> {
        if !self.surfaces.borrow_mut().remove(&surface_id) {
            return Err(StoreError::SurfaceNotFound(surface_id));
        }
        let mut tiles = self.tiles.borrow_mut();
        let before = tiles.len();
        tiles.retain(|t| t.surface_id != surface_id);
        let removed = before - tiles.len();
        info!(%surface_id, removed, "surface deleted; tiles cascaded");
        Ok(removed)
    }

    #[must_use]
    pub fn get(&self, id: &TileId) -> Option<Tile> {
        self.tiles.borrow().iter().find(|t| t.id == *id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.borrow().is_empty()
    }
}

fn valid_geometry(fields: &NewTile) -> bool {
    [fields.left, fields.top, fields.width, fields.height].iter().all(|v| v.is_finite())
        && fields.width > 0.0
        && fields.height > 0.0
}

#[async_trait(?Send)]
impl TileStore for MemoryTileStore {
    async fn list(&self, surface_id: SurfaceId) -> Result<Vec<Tile>, StoreError> {
        if !self.surfaces.borrow().contains(&surface_id) {
            return Err(StoreError::SurfaceNotFound(surface_id));
        }
        Ok(self.tiles.borrow().iter().filter(|t| t.surface_id == surface_id).cloned().collect())
    }

    async fn create(&self, fields: NewTile) -> Result<TileId, StoreError> {
        if !self.surfaces.borrow().contains(&fields.surface_id) {
            return Err(StoreError::SurfaceNotFound(fields.surface_id));
        }
        if !valid_geometry(&fields) {
            return Err(StoreError::InvalidGeometry);
        }
        let id = Uuid::new_v4();
        let tile = fields.snapped(self.grid_size).into_tile(id);
        info!(%id, surface_id = %tile.surface_id, "tile created");
        self.tiles.borrow_mut().push(tile);
        Ok(id)
    }

    /// Ids the store no longer holds are skipped; the rest of the batch applies.
    async fn update_many(&self, updates: Vec<TileUpdate>) -> Result<(), StoreError> {
        let mut tiles = self.tiles.borrow_mut();
        for update in &updates {
            let Some(tile) = tiles.iter_mut().find(|t| t.id == update.id) else {
                debug!(id = %update.id, "update for deleted tile skipped");
                continue;
            };
            update.patch.snapped(self.grid_size).apply_to(tile);
        }
        Ok(())
    }

    async fn remove_many(&self, ids: Vec<TileId>) -> Result<RemoveReport, StoreError> {
        let mut tiles = self.tiles.borrow_mut();
        let mut report = RemoveReport::default();
        for id in ids {
            match tiles.iter().position(|t| t.id == id) {
                Some(index) => {
                    tiles.remove(index);
                    report.removed.push(id);
                }
                None => report.errors.push(StoreError::NotFound(id).to_string()),
            }
        }
        if !report.errors.is_empty() {
            warn!(failed = report.errors.len(), removed = report.removed.len(), "batch delete partially failed");
        }
        Ok(report)
    }
}
