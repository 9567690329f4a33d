//! Browser glue (feature `hydrate`).
//!
//! SYSTEM CONTEXT
//! ==============
//! Everything that touches `web_sys` lives here: converting DOM events into
//! the crate's input types, measuring the tile container, backing
//! [`KeyValueStore`] with `localStorage`, and running store commits on the
//! browser's task queue without blocking the event handler.

use std::rc::Rc;

use tracing::debug;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;

use crate::action::Action;
use crate::commit::{commit_moves, remove_tiles};
use crate::input::{Button, Modifiers, PointerInput, WheelDelta};
use crate::notify::Notifier;
use crate::storage::{KeyValueStore, StorageError};
use crate::store::TileStore;
use crate::tile::{TileId, TileUpdate};
use crate::vec::{ContainerFrame, WindowVec};

// =============================================================================
// EVENTS
// =============================================================================

#[must_use]
pub fn client_position(ev: &web_sys::MouseEvent) -> WindowVec {
    WindowVec::new(f64::from(ev.client_x()), f64::from(ev.client_y()))
}

#[must_use]
pub fn modifiers(ev: &web_sys::MouseEvent) -> Modifiers {
    Modifiers { shift: ev.shift_key(), ctrl: ev.ctrl_key(), alt: ev.alt_key(), meta: ev.meta_key() }
}

/// Convert a pointer event. `None` for buttons the surface does not know.
#[must_use]
pub fn pointer_input(ev: &web_sys::PointerEvent) -> Option<PointerInput> {
    let button = Button::from_dom(ev.button())?;
    let mut input = PointerInput::new(client_position(ev), button, modifiers(ev));
    if ev.default_prevented() {
        input.prevent_default();
    }
    Some(input)
}

#[must_use]
pub fn wheel_delta(ev: &web_sys::WheelEvent) -> WheelDelta {
    WheelDelta { dx: ev.delta_x(), dy: ev.delta_y() }
}

/// Carry out the actions that act on the native event itself.
pub fn apply_to_event(ev: &web_sys::Event, actions: &[Action]) {
    if actions.contains(&Action::PreventDefault) {
        ev.prevent_default();
    }
}

// =============================================================================
// MEASUREMENT
// =============================================================================

/// Capture the tile container's window placement once, at press time.
#[must_use]
pub fn container_frame(element: &web_sys::Element, scale: f64) -> ContainerFrame {
    let rect = element.get_bounding_client_rect();
    ContainerFrame::new(WindowVec::new(rect.left(), rect.top()), scale)
}

/// Inner size of the browser window, if it can be read.
#[must_use]
pub fn window_size() -> Option<WindowVec> {
    let window = web_sys::window()?;
    let width = window.inner_width().map(|v| v.as_f64());
    let height = window.inner_height().map(|v| v.as_f64());
    match (width, height) {
        (Ok(Some(w)), Ok(Some(h))) => Some(WindowVec::new(w, h)),
        _ => None,
    }
}

/// Milliseconds since the Unix epoch.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn now_ms() -> i64 {
    js_sys::Date::now() as i64
}

// =============================================================================
// LOCAL STORAGE
// =============================================================================

/// [`KeyValueStore`] backed by `window.localStorage`.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when there is no window or the
    /// browser denies storage access.
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        match window.local_storage() {
            Ok(Some(storage)) => Ok(Self { storage }),
            Ok(None) | Err(_) => Err(StorageError::Unavailable),
        }
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                debug!(%key, error = %js_error(&e), "localStorage read failed");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(|e| StorageError::Write(js_error(&e)))
    }
}

fn js_error(e: &JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

// =============================================================================
// COMMITS
// =============================================================================

/// Dispatch a move batch without waiting for it. Failures reach `notifier`.
pub fn spawn_commit(store: Rc<dyn TileStore>, notifier: Rc<dyn Notifier>, updates: Vec<TileUpdate>) {
    spawn_local(async move {
        if let Err(e) = commit_moves(store.as_ref(), notifier.as_ref(), updates).await {
            debug!(error = %e, "move batch settled with error");
        }
    });
}

/// Dispatch a batch delete without waiting for it.
pub fn spawn_remove(store: Rc<dyn TileStore>, notifier: Rc<dyn Notifier>, ids: Vec<TileId>) {
    spawn_local(async move {
        match remove_tiles(store.as_ref(), notifier.as_ref(), ids).await {
            Ok(report) => debug!(removed = report.removed.len(), failed = report.errors.len(), "delete settled"),
            Err(e) => debug!(error = %e, "delete settled with error"),
        }
    });
}

/// Dispatch every `CommitMoves` in `actions`.
pub fn dispatch_commits(store: &Rc<dyn TileStore>, notifier: &Rc<dyn Notifier>, actions: &[Action]) {
    for action in actions {
        if let Action::CommitMoves(updates) = action {
            spawn_commit(Rc::clone(store), Rc::clone(notifier), updates.clone());
        }
    }
}
