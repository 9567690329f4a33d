#![allow(clippy::float_cmp)]

use std::rc::Rc;

use proptest::prelude::*;

use super::*;
use crate::input::{Button, Modifiers};
use crate::storage::MemoryStorage;

const EPSILON: f64 = 1e-9;

fn wv(x: f64, y: f64) -> WindowVec {
    WindowVec::new(x, y)
}

fn approx_vec(a: WindowVec, b: WindowVec) -> bool {
    (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
}

fn window() -> WindowVec {
    wv(800.0, 600.0)
}

fn controller_with(storage: Rc<MemoryStorage>) -> ViewportController {
    ViewportController::new(SurfaceConfig::default(), window(), storage, "room-1/map")
}

fn controller() -> (ViewportController, Rc<MemoryStorage>) {
    let storage = Rc::new(MemoryStorage::new());
    (controller_with(storage.clone()), storage)
}

fn press(button: Button, x: f64, y: f64) -> PointerInput {
    PointerInput::new(wv(x, y), button, Modifiers::NONE)
}

fn wheel_down() -> WheelDelta {
    WheelDelta { dx: 0.0, dy: 100.0 }
}

fn wheel_up() -> WheelDelta {
    WheelDelta { dx: 0.0, dy: -100.0 }
}

// =============================================================
// Pure helpers
// =============================================================

#[test]
fn scale_is_power_of_base() {
    assert_eq!(scale_for_tick(0), 1.0);
    assert!((scale_for_tick(1) - 1.2).abs() < EPSILON);
    assert!((scale_for_tick(-2) - 1.0 / 1.44).abs() < EPSILON);
}

#[test]
fn centered_puts_canvas_middle_at_window_middle() {
    let vp = Viewport::centered(CanvasVec::new(4000.0, 4000.0), window());
    assert_eq!(vp.offset, wv(-1600.0, -1700.0));
    assert_eq!(vp.zoom_tick, 0);
    assert_eq!(vp.canvas_to_window(CanvasVec::new(2000.0, 2000.0)), wv(400.0, 300.0));
}

#[test]
fn clamp_to_window_limits_both_directions() {
    let canvas = CanvasVec::new(1000.0, 1000.0);
    // Pushed too far right/down: near edge may not pass the window center.
    assert_eq!(clamp_to_window(wv(900.0, 900.0), 1.0, canvas, window()), wv(400.0, 300.0));
    // Pulled too far left/up: far edge may not pass the window center.
    assert_eq!(clamp_to_window(wv(-5000.0, -5000.0), 1.0, canvas, window()), wv(-600.0, -700.0));
    // Inside the band: untouched.
    assert_eq!(clamp_to_window(wv(-100.0, 0.0), 1.0, canvas, window()), wv(-100.0, 0.0));
}

#[test]
fn clamp_to_window_accounts_for_scale() {
    let canvas = CanvasVec::new(1000.0, 1000.0);
    assert_eq!(clamp_to_window(wv(-5000.0, -5000.0), 2.0, canvas, window()), wv(-1600.0, -1700.0));
}

#[test]
fn zoom_at_cursor_keeps_cursor_point_fixed() {
    let before = Viewport { offset: wv(-300.0, -200.0), zoom_tick: 0 };
    let cursor = wv(250.0, 175.0);
    let anchored = before.window_to_canvas(cursor);
    let after = Viewport {
        offset: zoom_at_cursor(before.offset, cursor, before.scale(), scale_for_tick(1)),
        zoom_tick: 1,
    };
    assert!(approx_vec(after.canvas_to_window(anchored), cursor));
}

#[test]
fn window_canvas_round_trip() {
    let vp = Viewport { offset: wv(13.0, -42.0), zoom_tick: 3 };
    let p = wv(333.3, 99.9);
    assert!(approx_vec(vp.canvas_to_window(vp.window_to_canvas(p)), p));
}

// =============================================================
// Persistence
// =============================================================

#[test]
fn missing_slot_falls_back_to_centered() {
    let (ctl, _) = controller();
    assert_eq!(ctl.viewport(), Viewport::centered(SurfaceConfig::default().canvas_size, window()));
}

#[test]
fn storage_key_is_prefixed() {
    let (ctl, _) = controller();
    assert_eq!(ctl.storage_key(), "tabletop:viewport:room-1/map");
}

#[test]
fn valid_slot_is_restored() {
    let storage = Rc::new(MemoryStorage::new());
    storage
        .set("tabletop:viewport:room-1/map", r#"{"offset":{"x":-100.0,"y":-50.0},"zoom":2}"#)
        .unwrap();
    let ctl = controller_with(storage);
    assert_eq!(ctl.viewport(), Viewport { offset: wv(-100.0, -50.0), zoom_tick: 2 });
}

#[test]
fn malformed_slot_falls_back_to_default() {
    let storage = Rc::new(MemoryStorage::new());
    storage.set("tabletop:viewport:room-1/map", "{\"offset\":3}").unwrap();
    let ctl = controller_with(storage);
    assert_eq!(ctl.viewport().zoom_tick, 0);
    assert_eq!(ctl.viewport(), Viewport::centered(SurfaceConfig::default().canvas_size, window()));
}

#[test]
fn out_of_range_zoom_is_rejected() {
    let storage = Rc::new(MemoryStorage::new());
    storage
        .set("tabletop:viewport:room-1/map", r#"{"offset":{"x":0.0,"y":0.0},"zoom":11}"#)
        .unwrap();
    let err = read_viewport(storage.as_ref(), "tabletop:viewport:room-1/map", &SurfaceConfig::default()).unwrap_err();
    assert!(matches!(err, ViewportLoadError::ZoomOutOfRange(11)));
    let ctl = controller_with(storage);
    assert_eq!(ctl.viewport().zoom_tick, 0);
}

#[test]
fn restored_offset_is_reclamped() {
    let storage = Rc::new(MemoryStorage::new());
    storage
        .set("tabletop:viewport:room-1/map", r#"{"offset":{"x":5000.0,"y":5000.0},"zoom":0}"#)
        .unwrap();
    let ctl = controller_with(storage);
    assert_eq!(ctl.viewport().offset, wv(400.0, 300.0));
}

#[test]
fn commit_writes_slot() {
    let (mut ctl, storage) = controller();
    ctl.wheel(wv(400.0, 300.0), wheel_up());
    let raw = storage.get("tabletop:viewport:room-1/map").unwrap();
    let stored: Viewport = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored, ctl.viewport());
    assert_eq!(stored.zoom_tick, 1);
}

// =============================================================
// Panning
// =============================================================

#[test]
fn middle_drag_pans_by_delta_on_release() {
    let (mut ctl, storage) = controller();
    let before = ctl.viewport().offset;
    let mut ev = press(Button::Middle, 100.0, 100.0);
    assert!(ctl.pointer_down(&mut ev));
    ctl.pointer_move(wv(150.0, 120.0));
    ctl.pointer_move(wv(200.0, 150.0));
    assert!(ctl.pointer_up(wv(200.0, 150.0)));
    assert_eq!(ctl.viewport().offset, before + wv(100.0, 50.0));
    assert!(storage.get(ctl.storage_key()).is_some());
}

#[test]
fn live_pan_renders_without_committing() {
    let (mut ctl, storage) = controller();
    let before = ctl.viewport();
    ctl.pointer_down(&mut press(Button::Secondary, 0.0, 0.0));
    ctl.pointer_move(wv(30.0, 40.0));
    assert!(ctl.is_panning());
    assert_eq!(ctl.viewport(), before);
    assert_eq!(ctl.rendered_offset(), before.offset + wv(30.0, 40.0));
    assert!(storage.get(ctl.storage_key()).is_none());
}

#[test]
fn pan_commit_is_clamped() {
    let (mut ctl, _) = controller();
    ctl.pointer_down(&mut press(Button::Middle, 0.0, 0.0));
    ctl.pointer_move(wv(5000.0, 5000.0));
    ctl.pointer_up(wv(5000.0, 5000.0));
    assert_eq!(ctl.viewport().offset, wv(400.0, 300.0));
}

#[test]
fn primary_button_does_not_pan_by_default() {
    let (mut ctl, _) = controller();
    assert!(!ctl.pointer_down(&mut press(Button::Primary, 0.0, 0.0)));
}

#[test]
fn pan_buttons_can_include_primary() {
    let (mut ctl, _) = controller();
    ctl.set_pan_buttons(ButtonMask::ALL);
    assert!(ctl.pointer_down(&mut press(Button::Primary, 0.0, 0.0)));
}

#[test]
fn small_pan_is_a_click() {
    let (mut ctl, _) = controller();
    let before = ctl.viewport();
    ctl.pointer_down(&mut press(Button::Middle, 0.0, 0.0));
    ctl.pointer_move(wv(3.0, 3.0));
    assert!(!ctl.pointer_up(wv(3.0, 3.0)));
    assert_eq!(ctl.viewport(), before);
}

#[test]
fn cancelled_pan_keeps_offset() {
    let (mut ctl, _) = controller();
    let before = ctl.viewport();
    ctl.pointer_down(&mut press(Button::Middle, 0.0, 0.0));
    ctl.pointer_move(wv(300.0, 0.0));
    assert!(ctl.pointer_cancel());
    assert_eq!(ctl.viewport(), before);
    assert_eq!(ctl.rendered_offset(), before.offset);
}

#[test]
fn right_button_pan_swallows_context_menu_once() {
    let (mut ctl, _) = controller();
    ctl.pointer_down(&mut press(Button::Secondary, 0.0, 0.0));
    ctl.pointer_move(wv(50.0, 0.0));
    ctl.pointer_up(wv(50.0, 0.0));
    assert!(ctl.context_menu());
    assert!(!ctl.context_menu());
}

// =============================================================
// Zooming
// =============================================================

#[test]
fn wheel_up_zooms_in_wheel_down_zooms_out() {
    let (mut ctl, _) = controller();
    assert!(ctl.wheel(wv(400.0, 300.0), wheel_up()));
    assert_eq!(ctl.viewport().zoom_tick, 1);
    assert!(ctl.wheel(wv(400.0, 300.0), wheel_down()));
    assert!(ctl.wheel(wv(400.0, 300.0), wheel_down()));
    assert_eq!(ctl.viewport().zoom_tick, -1);
}

#[test]
fn zero_wheel_delta_is_noop() {
    let (mut ctl, storage) = controller();
    let before = ctl.viewport();
    assert!(!ctl.wheel(wv(10.0, 10.0), WheelDelta { dx: 30.0, dy: 0.0 }));
    assert_eq!(ctl.viewport(), before);
    assert!(storage.get(ctl.storage_key()).is_none());
}

#[test]
fn zoom_is_clamped_to_tick_range() {
    let (mut ctl, _) = controller();
    for _ in 0..15 {
        ctl.wheel(wv(400.0, 300.0), wheel_up());
    }
    assert_eq!(ctl.viewport().zoom_tick, 10);
    assert!(!ctl.wheel(wv(400.0, 300.0), wheel_up()));
    for _ in 0..25 {
        ctl.wheel(wv(400.0, 300.0), wheel_down());
    }
    assert_eq!(ctl.viewport().zoom_tick, -10);
}

#[test]
fn wheel_keeps_point_under_cursor() {
    let (mut ctl, _) = controller();
    let cursor = wv(250.0, 420.0);
    let anchored = ctl.window_to_canvas(cursor);
    ctl.wheel(cursor, wheel_up());
    assert!(approx_vec(ctl.viewport().canvas_to_window(anchored), cursor));
}

#[test]
fn zoom_in_then_out_restores_offset() {
    let (mut ctl, _) = controller();
    let before = ctl.viewport();
    let cursor = wv(123.0, 456.0);
    for _ in 0..3 {
        ctl.wheel(cursor, wheel_up());
    }
    for _ in 0..3 {
        ctl.wheel(cursor, wheel_down());
    }
    assert_eq!(ctl.viewport().zoom_tick, before.zoom_tick);
    assert!(approx_vec(ctl.viewport().offset, before.offset));
}

#[test]
fn wheel_during_pan_anchors_rendered_view() {
    let (mut ctl, _) = controller();
    ctl.pointer_down(&mut press(Button::Middle, 0.0, 0.0));
    ctl.pointer_move(wv(40.0, 20.0));
    let cursor = wv(400.0, 300.0);
    let anchored = ctl.window_to_canvas(cursor);
    ctl.wheel(cursor, wheel_up());
    assert!(approx_vec(ctl.rendered().canvas_to_window(anchored), cursor));
}

// =============================================================
// Window resize / reset
// =============================================================

#[test]
fn shrinking_window_reclamps() {
    let (mut ctl, _) = controller();
    ctl.pointer_down(&mut press(Button::Middle, 0.0, 0.0));
    ctl.pointer_move(wv(5000.0, 5000.0));
    ctl.pointer_up(wv(5000.0, 5000.0));
    assert_eq!(ctl.viewport().offset, wv(400.0, 300.0));
    ctl.set_window_size(wv(400.0, 300.0));
    assert_eq!(ctl.viewport().offset, wv(200.0, 150.0));
}

#[test]
fn reset_recenters() {
    let (mut ctl, _) = controller();
    ctl.wheel(wv(0.0, 0.0), wheel_up());
    ctl.reset();
    assert_eq!(ctl.viewport(), Viewport::centered(SurfaceConfig::default().canvas_size, window()));
}

// =============================================================
// Properties
// =============================================================

proptest! {
    #[test]
    fn zoom_round_trip_restores_offset(
        cx in 0.0_f64..800.0,
        cy in 0.0_f64..600.0,
        ticks in 1_usize..5,
    ) {
        let (mut ctl, _) = controller();
        let before = ctl.viewport();
        let cursor = wv(cx, cy);
        for _ in 0..ticks {
            ctl.wheel(cursor, wheel_up());
        }
        for _ in 0..ticks {
            ctl.wheel(cursor, wheel_down());
        }
        prop_assert!(approx_vec(ctl.viewport().offset, before.offset));
    }

    #[test]
    fn committed_offset_always_clamped(dx in -10_000.0_f64..10_000.0, dy in -10_000.0_f64..10_000.0) {
        let (mut ctl, _) = controller();
        ctl.pointer_down(&mut press(Button::Middle, 0.0, 0.0));
        ctl.pointer_move(wv(dx, dy));
        ctl.pointer_up(wv(dx, dy));
        let offset = ctl.viewport().offset;
        prop_assert_eq!(clamp_to_window(offset, ctl.scale(), SurfaceConfig::default().canvas_size, window()), offset);
    }
}
