//! Input model: pointer buttons, modifier keys, and the pointer event record.
//!
//! These are the types every gesture consumes. `PointerInput` mirrors the
//! subset of a DOM pointer event the surface needs, including the
//! "default prevented" flag that lets a nested handler (a tile) claim a press
//! before the enclosing background sees it.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::ops::BitOr;

use crate::vec::WindowVec;

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false, meta: false };

    #[must_use]
    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::NONE }
    }

    #[must_use]
    pub fn shift() -> Self {
        Self { shift: true, ..Self::NONE }
    }

    /// Ctrl or shift: the keys that turn a tile click into a selection toggle.
    #[must_use]
    pub fn is_toggle(self) -> bool {
        self.ctrl || self.shift
    }

    #[must_use]
    pub fn any(self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code. Back/forward buttons are not tracked.
    #[must_use]
    pub fn from_dom(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_primary(self) -> bool {
        self == Self::Primary
    }

    fn bit(self) -> u8 {
        match self {
            Self::Primary => 0b001,
            Self::Middle => 0b010,
            Self::Secondary => 0b100,
        }
    }
}

/// Set of buttons allowed to start a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonMask(u8);

impl ButtonMask {
    pub const NONE: Self = Self(0);
    pub const PRIMARY: Self = Self(0b001);
    pub const MIDDLE: Self = Self(0b010);
    pub const SECONDARY: Self = Self(0b100);
    pub const ALL: Self = Self(0b111);

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub fn contains(self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }
}

impl BitOr for ButtonMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl From<Button> for ButtonMask {
    fn from(button: Button) -> Self {
        Self(button.bit())
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// A pointer event as seen by the surface, in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub position: WindowVec,
    pub button: Button,
    pub modifiers: Modifiers,
    default_prevented: bool,
}

impl PointerInput {
    #[must_use]
    pub fn new(position: WindowVec, button: Button, modifiers: Modifiers) -> Self {
        Self { position, button, modifiers, default_prevented: false }
    }

    /// Primary-button event with no modifiers.
    #[must_use]
    pub fn primary(x: f64, y: f64) -> Self {
        Self::new(WindowVec::new(x, y), Button::Primary, Modifiers::NONE)
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn with_button(mut self, button: Button) -> Self {
        self.button = button;
        self
    }

    /// Mark the event as claimed; outer handlers will not start a press from it.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}
