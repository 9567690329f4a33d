//! Interactive surface engine for the virtual tabletop.
//!
//! A surface is a bounded virtual canvas holding positioned rectangular tiles.
//! This crate owns everything between raw window events and the tile store:
//! pan/zoom of the canvas, rubber-band multi-select, grouped drag-move with
//! grid snapping, and a stacking order that never reorders rendered elements.
//! The host wires DOM events in, carries out the returned [`action::Action`]s,
//! and forwards move batches to its [`store::TileStore`].
//!
//! Everything outside [`web`] is plain Rust and runs under `cargo test`.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`surface`] | Top-level façade routing events to viewport and tile area |
//! | [`tile_area`] | Rubber-band selection and grouped drag-move |
//! | [`viewport`] | Pan/zoom over the canvas, clamping, persistence |
//! | [`drag`] | Press / threshold / release state machine |
//! | [`selection`] | Immutable-snapshot selection set |
//! | [`render`] | Stacking order and per-tile views |
//! | [`tile`] | Tile records, patches, and the local mirror |
//! | [`store`] | Tile persistence contract and in-memory store |
//! | [`commit`] | Dispatch of move and delete batches |
//! | [`notify`] | User-facing notification sink |
//! | [`storage`] | Key-value slots for persisted UI state |
//! | [`input`] | Pointer, button and modifier types |
//! | [`vec`] | Coordinate-space-tagged vector algebra |
//! | [`action`] | Side effects requested from the host |
//! | [`config`] | Tunables with environment overrides |
//! | [`consts`] | Shared numeric constants (grid, threshold, zoom range) |
//! | `web` | Browser glue, feature `hydrate` |

pub mod action;
pub mod commit;
pub mod config;
pub mod consts;
pub mod drag;
pub mod input;
pub mod notify;
pub mod render;
pub mod selection;
pub mod storage;
pub mod store;
pub mod surface;
pub mod tile;
pub mod tile_area;
pub mod vec;
pub mod viewport;
#[cfg(feature = "hydrate")]
pub mod web;
