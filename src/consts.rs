//! Shared numeric constants for the surface crate.

// ── Grid ────────────────────────────────────────────────────────

/// Tile positions are committed as multiples of this many canvas units.
pub const GRID_SIZE: f64 = 20.0;

// ── Drag ────────────────────────────────────────────────────────

/// Pointer travel (window pixels) a press must exceed before it becomes a drag.
pub const DRAG_THRESHOLD: f64 = 8.0;

// ── Zoom ────────────────────────────────────────────────────────

/// Scale multiplier applied per zoom tick.
pub const ZOOM_BASE: f64 = 1.2;

/// Furthest zoom-out tick.
pub const ZOOM_TICK_MIN: i32 = -10;

/// Furthest zoom-in tick.
pub const ZOOM_TICK_MAX: i32 = 10;

// ── Canvas ──────────────────────────────────────────────────────

/// Default virtual canvas width in canvas units.
pub const CANVAS_WIDTH: f64 = 4000.0;

/// Default virtual canvas height in canvas units.
pub const CANVAS_HEIGHT: f64 = 4000.0;

// ── Persistence ─────────────────────────────────────────────────

/// Key prefix for persisted viewport slots.
pub const VIEWPORT_KEY_PREFIX: &str = "tabletop:viewport:";
