//! Pan/zoom viewport over a bounded virtual canvas.
//!
//! DESIGN
//! ======
//! The committed [`Viewport`] is what gets persisted. While a pan drag is in
//! flight the rendered offset is `committed + live delta`; the committed value
//! only changes (and is only written to storage) on release or on a wheel
//! tick, so pointer-move never touches persistence.
//!
//! Every committed offset is clamped with [`clamp_to_window`] so the canvas
//! always covers the window's center point.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SurfaceConfig;
use crate::consts::{VIEWPORT_KEY_PREFIX, ZOOM_BASE};
use crate::drag::{DragGesture, Release};
use crate::input::{ButtonMask, PointerInput, WheelDelta};
use crate::storage::{KeyValueStore, load_json, save_json};
use crate::vec::{CanvasVec, ContainerFrame, WindowVec, clamp};

/// Buttons that pan by default.
pub const PAN_BUTTONS: ButtonMask = ButtonMask::MIDDLE.union(ButtonMask::SECONDARY);

/// Canvas placement in the window: top-left offset plus an integer zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub offset: WindowVec,
    #[serde(rename = "zoom")]
    pub zoom_tick: i32,
}

impl Viewport {
    /// Canvas centered in the window at zoom tick 0.
    #[must_use]
    pub fn centered(canvas_size: CanvasVec, window_size: WindowVec) -> Self {
        let offset = WindowVec::new(
            (window_size.x - canvas_size.x) / 2.0,
            (window_size.y - canvas_size.y) / 2.0,
        );
        Self { offset, zoom_tick: 0 }
    }

    /// `1.2 ^ zoom_tick`.
    #[must_use]
    pub fn scale(&self) -> f64 {
        scale_for_tick(self.zoom_tick)
    }

    #[must_use]
    pub fn window_to_canvas(&self, point: WindowVec) -> CanvasVec {
        self.frame().window_to_canvas(point)
    }

    #[must_use]
    pub fn canvas_to_window(&self, point: CanvasVec) -> WindowVec {
        let scale = self.scale();
        WindowVec::new(point.x * scale + self.offset.x, point.y * scale + self.offset.y)
    }

    /// The canvas origin as a container frame; tile containers sit at canvas (0, 0).
    #[must_use]
    pub fn frame(&self) -> ContainerFrame {
        ContainerFrame::new(self.offset, self.scale())
    }
}

#[must_use]
pub fn scale_for_tick(zoom_tick: i32) -> f64 {
    ZOOM_BASE.powi(zoom_tick)
}

/// Constrain `offset` so the scaled canvas still covers the window center.
///
/// Each axis is limited to `[-canvas * scale + window / 2, window / 2]`.
#[must_use]
pub fn clamp_to_window(offset: WindowVec, scale: f64, canvas_size: CanvasVec, window_size: WindowVec) -> WindowVec {
    let half_window = window_size / 2.0;
    let scaled_canvas = WindowVec::new(canvas_size.x * scale, canvas_size.y * scale);
    clamp(offset, half_window - scaled_canvas, half_window)
}

/// Offset that keeps the canvas point under `cursor` fixed across a scale change.
#[must_use]
pub fn zoom_at_cursor(offset: WindowVec, cursor: WindowVec, old_scale: f64, new_scale: f64) -> WindowVec {
    (offset - cursor) * (new_scale / old_scale) + cursor
}

// =============================================================================
// PERSISTENCE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ViewportLoadError {
    #[error("no persisted viewport")]
    Missing,
    #[error("malformed viewport: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("zoom tick {0} out of range")]
    ZoomOutOfRange(i32),
    #[error("offset is not finite")]
    NonFiniteOffset,
}

/// Read and validate the slot under `key`.
///
/// # Errors
///
/// Returns [`ViewportLoadError`] for absent, malformed or out-of-range data.
pub fn read_viewport(store: &dyn KeyValueStore, key: &str, config: &SurfaceConfig) -> Result<Viewport, ViewportLoadError> {
    let viewport: Viewport = load_json::<Viewport>(store, key).ok_or(ViewportLoadError::Missing)??;
    if !(config.zoom_tick_min..=config.zoom_tick_max).contains(&viewport.zoom_tick) {
        return Err(ViewportLoadError::ZoomOutOfRange(viewport.zoom_tick));
    }
    if !viewport.offset.is_finite() {
        return Err(ViewportLoadError::NonFiniteOffset);
    }
    Ok(viewport)
}

/// Load the persisted viewport, falling back to a centered default.
///
/// Rejected data is logged and replaced; it is never surfaced to the user.
#[must_use]
pub fn load_viewport(store: &dyn KeyValueStore, key: &str, config: &SurfaceConfig, window_size: WindowVec) -> Viewport {
    let viewport = match read_viewport(store, key, config) {
        Ok(viewport) => viewport,
        Err(ViewportLoadError::Missing) => Viewport::centered(config.canvas_size, window_size),
        Err(e) => {
            warn!(%key, error = %e, "persisted viewport rejected; using default");
            Viewport::centered(config.canvas_size, window_size)
        }
    };
    Viewport {
        offset: clamp_to_window(viewport.offset, viewport.scale(), config.canvas_size, window_size),
        ..viewport
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Owns the committed viewport for one surface view and interprets pan drags
/// and wheel ticks.
pub struct ViewportController {
    viewport: Viewport,
    pan: DragGesture,
    config: SurfaceConfig,
    window_size: WindowVec,
    storage: Rc<dyn KeyValueStore>,
    key: String,
}

impl ViewportController {
    /// Create a controller for `view_key`, restoring its persisted state.
    #[must_use]
    pub fn new(config: SurfaceConfig, window_size: WindowVec, storage: Rc<dyn KeyValueStore>, view_key: &str) -> Self {
        let key = format!("{VIEWPORT_KEY_PREFIX}{view_key}");
        let viewport = load_viewport(storage.as_ref(), &key, &config, window_size);
        Self {
            viewport,
            pan: DragGesture::with_threshold(PAN_BUTTONS, config.drag_threshold),
            config,
            window_size,
            storage,
            key,
        }
    }

    /// The committed (persisted) viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.viewport.scale()
    }

    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn window_size(&self) -> WindowVec {
        self.window_size
    }

    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.pan.is_dragging()
    }

    /// A pan button is down, whether or not it has moved past the threshold.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.pan.is_active()
    }

    /// Offset to draw with: committed offset plus any uncommitted pan delta.
    #[must_use]
    pub fn rendered_offset(&self) -> WindowVec {
        self.viewport.offset + self.pan.delta()
    }

    /// The viewport as currently drawn.
    #[must_use]
    pub fn rendered(&self) -> Viewport {
        Viewport { offset: self.rendered_offset(), ..self.viewport }
    }

    #[must_use]
    pub fn frame(&self) -> ContainerFrame {
        self.rendered().frame()
    }

    #[must_use]
    pub fn window_to_canvas(&self, point: WindowVec) -> CanvasVec {
        self.rendered().window_to_canvas(point)
    }

    /// Allow a different button set to start a pan (e.g. primary in pan mode).
    pub fn set_pan_buttons(&mut self, buttons: ButtonMask) {
        self.pan.set_buttons(buttons);
    }

    /// Track a window resize; the committed offset is reclamped.
    pub fn set_window_size(&mut self, window_size: WindowVec) {
        self.window_size = window_size;
        self.commit(self.viewport);
    }

    /// Recenter at zoom tick 0.
    pub fn reset(&mut self) {
        self.commit(Viewport::centered(self.config.canvas_size, self.window_size));
    }

    // --- Pointer events ---

    pub fn pointer_down(&mut self, event: &mut PointerInput) -> bool {
        self.pan.press(event)
    }

    pub fn pointer_move(&mut self, position: WindowVec) -> bool {
        self.pan.pointer_move(position)
    }

    /// Commit the pan on release. Returns `true` when the offset was committed.
    pub fn pointer_up(&mut self, position: WindowVec) -> bool {
        match self.pan.release(position) {
            Release::Dragged(end) => {
                self.commit(Viewport { offset: self.viewport.offset + end.delta, ..self.viewport });
                true
            }
            Release::Click { .. } | Release::Ignored => false,
        }
    }

    pub fn pointer_cancel(&mut self) -> bool {
        self.pan.cancel()
    }

    /// Whether a `contextmenu` event following a right-button pan must be swallowed.
    pub fn context_menu(&mut self) -> bool {
        self.pan.take_context_menu_suppression()
    }

    /// Zoom one tick toward or away from `cursor`. Returns `true` if the zoom changed.
    ///
    /// Scrolling down (`dy > 0`) zooms out. A zero delta or a tick already at
    /// its limit is a no-op.
    pub fn wheel(&mut self, cursor: WindowVec, delta: WheelDelta) -> bool {
        if delta.dy == 0.0 || delta.dy.is_nan() {
            return false;
        }
        let step = if delta.dy > 0.0 { -1 } else { 1 };
        let zoom_tick = (self.viewport.zoom_tick + step).clamp(self.config.zoom_tick_min, self.config.zoom_tick_max);
        if zoom_tick == self.viewport.zoom_tick {
            return false;
        }
        // The rendered offset includes any live pan delta; anchor against it.
        let live = self.pan.delta();
        let anchor = cursor - live;
        let offset = zoom_at_cursor(self.viewport.offset, anchor, self.scale(), scale_for_tick(zoom_tick));
        self.commit(Viewport { offset, zoom_tick });
        true
    }

    fn commit(&mut self, viewport: Viewport) {
        let offset = clamp_to_window(viewport.offset, viewport.scale(), self.config.canvas_size, self.window_size);
        self.viewport = Viewport { offset, ..viewport };
        match save_json(self.storage.as_ref(), &self.key, &self.viewport) {
            Ok(()) => debug!(key = %self.key, zoom = self.viewport.zoom_tick, "viewport persisted"),
            Err(e) => warn!(key = %self.key, error = %e, "failed to persist viewport"),
        }
    }
}
