//! End-to-end surface scenarios driven through the public API.
#![allow(clippy::float_cmp)]

use std::rc::Rc;

use tabletop_surface::action::Action;
use tabletop_surface::commit::commit_moves;
use tabletop_surface::config::SurfaceConfig;
use tabletop_surface::input::{Button, Modifiers, PointerInput, WheelDelta};
use tabletop_surface::notify::RecordingNotifier;
use tabletop_surface::storage::{KeyValueStore, MemoryStorage};
use tabletop_surface::store::{MemoryTileStore, TileStore};
use tabletop_surface::surface::Surface;
use tabletop_surface::tile::{NewTile, SurfaceId, TileId, TileUpdate};
use tabletop_surface::vec::{CanvasVec, WindowVec};
use tabletop_surface::viewport::{Viewport, clamp_to_window};
use uuid::Uuid;

const NOW: i64 = 1_700_000_000_000;

fn window() -> WindowVec {
    WindowVec::new(800.0, 600.0)
}

struct Table {
    surface: Surface,
    store: MemoryTileStore,
    storage: Rc<MemoryStorage>,
    ids: Vec<TileId>,
}

/// Three 50x50 tiles at (0,0), (100,0), (200,0), mirrored from the store.
async fn table() -> Table {
    let surface_id: SurfaceId = Uuid::new_v4();
    let store = MemoryTileStore::default();
    store.add_surface(surface_id);
    let mut ids = Vec::new();
    for left in [0.0, 100.0, 200.0] {
        let fields = NewTile { surface_id, left, top: 0.0, width: 50.0, height: 50.0, asset_ref: None };
        ids.push(store.create(fields).await.unwrap());
    }
    let storage = Rc::new(MemoryStorage::new());
    let mut surface = Surface::new(surface_id, SurfaceConfig::default(), window(), storage.clone(), "room-7/map-1");
    surface.tiles_mut().sync(store.list(surface_id).await.unwrap());
    Table { surface, store, storage, ids }
}

/// Window position of canvas point (x, y) under the surface's current viewport.
fn at(surface: &Surface, x: f64, y: f64) -> WindowVec {
    surface.viewport().rendered().canvas_to_window(CanvasVec::new(x, y))
}

fn commit_batches(actions: &[Action]) -> Vec<Vec<TileUpdate>> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::CommitMoves(updates) => Some(updates.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn rubber_band_then_group_drag_commits_one_batch() {
    let Table { mut surface, store, ids, .. } = table().await;

    // Rubber band from canvas (10,10) to (120,60).
    let down = PointerInput::new(at(&surface, 10.0, 10.0), Button::Primary, Modifiers::NONE);
    surface.on_pointer_down(down, None);
    surface.on_pointer_move(at(&surface, 120.0, 60.0));
    surface.on_pointer_up(at(&surface, 120.0, 60.0), NOW);

    let selection = surface.tiles().selection();
    assert_eq!(selection.len(), 2);
    assert!(selection.is_selected(&ids[0]));
    assert!(selection.is_selected(&ids[1]));
    assert!(!selection.is_selected(&ids[2]));

    // Drag tile 1 by (+20, +20).
    let start = at(&surface, 25.0, 25.0);
    let end = at(&surface, 45.0, 45.0);
    surface.on_pointer_down(PointerInput::new(start, Button::Primary, Modifiers::NONE), Some(ids[0]));
    surface.on_pointer_move(end);
    let actions = surface.on_pointer_up(end, NOW);

    let batches = commit_batches(&actions);
    assert_eq!(batches.len(), 1);
    let batch = batches.into_iter().next().unwrap();
    assert_eq!(batch.len(), 2);
    let positions: Vec<_> = batch.iter().map(|u| (u.id, u.patch.left, u.patch.top)).collect();
    assert_eq!(positions, vec![(ids[0], Some(20.0), Some(20.0)), (ids[1], Some(120.0), Some(20.0))]);

    let notifier = RecordingNotifier::new();
    commit_moves(&store, &notifier, batch).await.unwrap();
    assert!(notifier.messages().is_empty());
    let confirmed = store.get(&ids[1]).unwrap();
    assert_eq!((confirmed.left, confirmed.top), (120.0, 20.0));
    assert_eq!(confirmed.last_moved_at, Some(NOW));
    assert_eq!(store.get(&ids[2]).unwrap().left, 200.0);
}

#[tokio::test]
async fn group_move_survives_tile_deleted_elsewhere() {
    let Table { mut surface, store, ids, .. } = table().await;

    surface.on_pointer_down(PointerInput::new(at(&surface, 10.0, 10.0), Button::Primary, Modifiers::NONE), None);
    surface.on_pointer_move(at(&surface, 120.0, 60.0));
    surface.on_pointer_up(at(&surface, 120.0, 60.0), NOW);
    assert_eq!(surface.tiles().selection().len(), 2);

    // Another session deletes tile 1; the local mirror has not heard yet.
    let report = store.remove_many(vec![ids[1]]).await.unwrap();
    assert_eq!(report.removed, vec![ids[1]]);

    let start = at(&surface, 25.0, 25.0);
    let end = at(&surface, 65.0, 65.0);
    surface.on_pointer_down(PointerInput::new(start, Button::Primary, Modifiers::NONE), Some(ids[0]));
    surface.on_pointer_move(end);
    let batch = commit_batches(&surface.on_pointer_up(end, NOW)).into_iter().next().unwrap();
    assert_eq!(batch.len(), 2);

    let notifier = RecordingNotifier::new();
    commit_moves(&store, &notifier, batch).await.unwrap();
    assert!(notifier.messages().is_empty());
    let moved = store.get(&ids[0]).unwrap();
    assert_eq!((moved.left, moved.top), (40.0, 40.0));
    assert!(store.get(&ids[1]).is_none());

    let listed = store.list(surface.tiles().surface_id()).await.unwrap();
    surface.tiles_mut().sync(listed);
    assert_eq!(surface.tiles().doc().len(), 2);
    assert_eq!(surface.tiles().selection().len(), 1);
    assert!(surface.tiles().selection().is_selected(&ids[0]));
}

#[tokio::test]
async fn middle_button_pan_persists_exact_delta() {
    let Table { mut surface, storage, .. } = table().await;
    let before = surface.viewport().viewport();

    let down = PointerInput::new(WindowVec::new(300.0, 300.0), Button::Middle, Modifiers::NONE);
    surface.on_pointer_down(down, None);
    surface.on_pointer_move(WindowVec::new(400.0, 350.0));
    surface.on_pointer_up(WindowVec::new(400.0, 350.0), NOW);

    let expected = clamp_to_window(
        before.offset + WindowVec::new(100.0, 50.0),
        before.scale(),
        SurfaceConfig::default().canvas_size,
        window(),
    );
    let after = surface.viewport().viewport();
    assert_eq!(after.offset, before.offset + WindowVec::new(100.0, 50.0));
    assert_eq!(after.offset, expected);

    let raw = storage.get(surface.viewport().storage_key()).unwrap();
    let persisted: Viewport = serde_json::from_str(&raw).unwrap();
    assert_eq!(persisted.offset, after.offset);
}

#[tokio::test]
async fn pan_past_the_edge_is_clamped() {
    let Table { mut surface, .. } = table().await;
    let down = PointerInput::new(WindowVec::new(0.0, 0.0), Button::Middle, Modifiers::NONE);
    surface.on_pointer_down(down, None);
    surface.on_pointer_move(WindowVec::new(5_000.0, 5_000.0));
    surface.on_pointer_up(WindowVec::new(5_000.0, 5_000.0), NOW);
    // The canvas's near edge may not pass the window center.
    assert_eq!(surface.viewport().viewport().offset, WindowVec::new(400.0, 300.0));
}

#[tokio::test]
async fn ctrl_click_on_selected_tile_toggles_it_out() {
    let Table { mut surface, ids, .. } = table().await;
    surface.tiles_mut().select_all();

    let position = at(&surface, 110.0, 10.0);
    let down = PointerInput::new(position, Button::Primary, Modifiers::ctrl());
    surface.on_pointer_down(down, Some(ids[1]));
    let actions = surface.on_pointer_up(position, NOW);

    assert!(commit_batches(&actions).is_empty());
    let selection = surface.tiles().selection();
    assert!(!selection.is_selected(&ids[1]));
    assert!(selection.is_selected(&ids[0]));
    assert!(selection.is_selected(&ids[2]));
}

#[tokio::test]
async fn viewport_survives_reload() {
    let Table { mut surface, storage, .. } = table().await;
    surface.on_wheel(WindowVec::new(100.0, 100.0), WheelDelta { dx: 0.0, dy: -120.0 });
    let saved = surface.viewport().viewport();

    let reloaded = Surface::new(Uuid::new_v4(), SurfaceConfig::default(), window(), storage.clone(), "room-7/map-1");
    assert_eq!(reloaded.viewport().viewport(), saved);

    let other_view = Surface::new(Uuid::new_v4(), SurfaceConfig::default(), window(), storage, "room-7/map-2");
    assert_eq!(other_view.viewport().viewport().zoom_tick, 0);
}

#[tokio::test]
async fn zooming_keeps_the_cursor_anchored() {
    let Table { mut surface, .. } = table().await;
    let cursor = WindowVec::new(250.0, 410.0);
    let before = surface.viewport().window_to_canvas(cursor);
    surface.on_wheel(cursor, WheelDelta { dx: 0.0, dy: -1.0 });
    surface.on_wheel(cursor, WheelDelta { dx: 0.0, dy: -1.0 });
    let after = surface.viewport().window_to_canvas(cursor);
    assert!((before.x - after.x).abs() < 1e-9);
    assert!((before.y - after.y).abs() < 1e-9);
}

#[tokio::test]
async fn deleting_selection_reports_through_notifier() {
    let Table { mut surface, store, ids, .. } = table().await;
    surface.tiles_mut().select_all();
    let doomed = surface.tiles_mut().delete_selected();
    assert_eq!(doomed, ids);

    let notifier = RecordingNotifier::new();
    let report = tabletop_surface::commit::remove_tiles(&store, &notifier, doomed).await.unwrap();
    assert_eq!(report.removed.len(), 3);
    surface.tiles_mut().remove_tiles(&report.removed);
    assert!(surface.tiles().doc().is_empty());
    assert!(store.is_empty());
}
