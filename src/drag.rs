//! Pointer-drag primitive: press, threshold-gated drag, release.
//!
//! [`DragState::step`] is the whole state machine as a pure function of the
//! current state and one event. [`DragGesture`] owns one state value plus the
//! per-instance configuration (which buttons may start a press, the movement
//! threshold) and the one-shot context-menu suppression flag.
//!
//! ```text
//! Idle --down--> Pressed --move (dist > threshold)--> Dragging
//!                  |  ^                                 |   |
//!                  |  +--move (within threshold)        |   +--move
//!                  +--up / cancel--> Idle (click)       +--up--> Idle + DragEnd
//!                                                       +--cancel--> Idle
//! ```

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use crate::consts::DRAG_THRESHOLD;
use crate::input::{Button, ButtonMask, PointerInput};
use crate::vec::{WindowVec, distance};

/// Lifecycle phase of a single press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    /// Button is down but movement has not exceeded the threshold yet.
    Pressed,
    /// Movement exceeded the threshold; deltas are live.
    Dragging,
}

/// Snapshot of one press. `start`, `end` and `button` are meaningful only
/// while the phase is not `Idle`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub phase: DragPhase,
    pub start: WindowVec,
    pub end: WindowVec,
    pub button: Button,
}

impl Default for DragState {
    fn default() -> Self {
        Self {
            phase: DragPhase::Idle,
            start: WindowVec::zero(),
            end: WindowVec::zero(),
            button: Button::Primary,
        }
    }
}

/// Input to [`DragState::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Down { position: WindowVec, button: Button },
    Move(WindowVec),
    Up(WindowVec),
    Cancel,
}

/// A drag that finished by release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragEnd {
    pub start: WindowVec,
    pub end: WindowVec,
    pub delta: WindowVec,
    pub button: Button,
}

/// Result of one state-machine step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: DragState,
    /// Set only on release from `Dragging`.
    pub completed: Option<DragEnd>,
}

impl DragState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.phase == DragPhase::Idle
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    /// `end - start` while dragging, zero otherwise.
    #[must_use]
    pub fn delta(&self) -> WindowVec {
        if self.is_dragging() { self.end - self.start } else { WindowVec::zero() }
    }

    /// Advance the state machine by one event.
    ///
    /// Events that make no sense in the current phase (a move while idle, a
    /// second down while pressed) leave the state untouched.
    #[must_use]
    pub fn step(self, event: DragEvent, threshold: f64) -> Transition {
        let unchanged = Transition { state: self, completed: None };
        match (self.phase, event) {
            (DragPhase::Idle, DragEvent::Down { position, button }) => Transition {
                state: Self { phase: DragPhase::Pressed, start: position, end: position, button },
                completed: None,
            },
            (DragPhase::Pressed, DragEvent::Move(position)) => {
                let phase = if distance(self.start, position) > threshold {
                    DragPhase::Dragging
                } else {
                    DragPhase::Pressed
                };
                Transition { state: Self { phase, end: position, ..self }, completed: None }
            }
            (DragPhase::Dragging, DragEvent::Move(position)) => {
                Transition { state: Self { end: position, ..self }, completed: None }
            }
            (DragPhase::Dragging, DragEvent::Up(position)) => Transition {
                state: Self::default(),
                completed: Some(DragEnd {
                    start: self.start,
                    end: position,
                    delta: position - self.start,
                    button: self.button,
                }),
            },
            (DragPhase::Pressed, DragEvent::Up(_) | DragEvent::Cancel)
            | (DragPhase::Dragging, DragEvent::Cancel) => Transition { state: Self::default(), completed: None },
            _ => unchanged,
        }
    }
}

/// Outcome of [`DragGesture::release`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    /// No press was active.
    Ignored,
    /// The press never reached the threshold.
    Click { position: WindowVec, button: Button },
    /// A drag completed.
    Dragged(DragEnd),
}

/// One drag-primitive instance.
#[derive(Debug, Clone)]
pub struct DragGesture {
    state: DragState,
    buttons: ButtonMask,
    threshold: f64,
    suppress_context_menu: bool,
}

impl Default for DragGesture {
    fn default() -> Self {
        Self::new(ButtonMask::PRIMARY)
    }
}

impl DragGesture {
    #[must_use]
    pub fn new(buttons: ButtonMask) -> Self {
        Self::with_threshold(buttons, DRAG_THRESHOLD)
    }

    #[must_use]
    pub fn with_threshold(buttons: ButtonMask, threshold: f64) -> Self {
        Self { state: DragState::default(), buttons, threshold, suppress_context_menu: false }
    }

    #[must_use]
    pub fn state(&self) -> DragState {
        self.state
    }

    #[must_use]
    pub fn delta(&self) -> WindowVec {
        self.state.delta()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.state.is_idle()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    #[must_use]
    pub fn buttons(&self) -> ButtonMask {
        self.buttons
    }

    /// Change which buttons may start a press. An in-flight press is unaffected.
    pub fn set_buttons(&mut self, buttons: ButtonMask) {
        self.buttons = buttons;
    }

    /// Begin a press from `event`.
    ///
    /// Returns `false` and leaves the event alone when the button is not
    /// accepted, a press is already in flight, or a nested handler already
    /// claimed the event. On acceptance the event is claimed.
    pub fn press(&mut self, event: &mut PointerInput) -> bool {
        if !self.accepts(event) {
            return false;
        }
        self.apply(DragEvent::Down { position: event.position, button: event.button });
        event.prevent_default();
        true
    }

    /// Claim `event` under the same rules as [`Self::press`] without starting
    /// a press, so outer handlers skip it.
    pub fn claim(&self, event: &mut PointerInput) -> bool {
        if !self.accepts(event) {
            return false;
        }
        event.prevent_default();
        true
    }

    fn accepts(&self, event: &PointerInput) -> bool {
        !event.default_prevented() && self.buttons.contains(event.button) && !self.is_active()
    }

    /// Track pointer movement. Returns `true` when the browser's default
    /// handling (text selection and the like) must be suppressed.
    pub fn pointer_move(&mut self, position: WindowVec) -> bool {
        self.apply(DragEvent::Move(position));
        self.is_dragging()
    }

    /// Finish the press.
    pub fn release(&mut self, position: WindowVec) -> Release {
        let before = self.state;
        match self.apply(DragEvent::Up(position)) {
            Some(end) => {
                if !end.button.is_primary() {
                    self.suppress_context_menu = true;
                }
                Release::Dragged(end)
            }
            None if before.phase == DragPhase::Pressed => {
                Release::Click { position: before.start, button: before.button }
            }
            None => Release::Ignored,
        }
    }

    /// Abort without completing. Returns `true` if a press was in flight.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_active();
        self.apply(DragEvent::Cancel);
        was_active
    }

    /// Whether the next `contextmenu` event must be swallowed. Clears the flag.
    pub fn take_context_menu_suppression(&mut self) -> bool {
        std::mem::take(&mut self.suppress_context_menu)
    }

    fn apply(&mut self, event: DragEvent) -> Option<DragEnd> {
        let transition = self.state.step(event, self.threshold);
        self.state = transition.state;
        transition.completed
    }
}
