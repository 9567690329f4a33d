//! 2D vector algebra tagged by coordinate space.
//!
//! Pointer events arrive in window space, the tile container is measured
//! relative to its own top-left corner, and tile geometry lives in canvas
//! units (container pixels divided by the current zoom scale). Each space is a
//! distinct type parameter so that arithmetic can only combine vectors of the
//! same space; moving between spaces goes through [`ContainerFrame`] or
//! [`crate::viewport::Viewport`].
//!
//! All operations are pure and total. Sizes are vectors too: `x` is the width
//! and `y` the height.

#[cfg(test)]
#[path = "vec_test.rs"]
mod vec_test;

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Marker for a coordinate space.
pub trait Space: 'static {
    /// Type name used in `Debug` output.
    const NAME: &'static str;
}

/// Browser window coordinates (CSS pixels from the viewport's top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {}

/// Coordinates relative to the tile container's top-left, unscaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {}

/// Virtual canvas units; tile geometry is stored in this space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Canvas {}

impl Space for Window {
    const NAME: &'static str = "WindowVec";
}

impl Space for Container {
    const NAME: &'static str = "ContainerVec";
}

impl Space for Canvas {
    const NAME: &'static str = "CanvasVec";
}

/// An `(x, y)` pair in space `S`.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Vec2<S: Space> {
    pub x: f64,
    pub y: f64,
    #[serde(skip)]
    space: PhantomData<S>,
}

pub type WindowVec = Vec2<Window>;
pub type ContainerVec = Vec2<Container>;
pub type CanvasVec = Vec2<Canvas>;

impl<S: Space> Vec2<S> {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, space: PhantomData }
    }

    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Uniform scale by `factor`.
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Both components are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl<S: Space> Clone for Vec2<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Space> Copy for Vec2<S> {}

impl<S: Space> PartialEq for Vec2<S> {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl<S: Space> Default for Vec2<S> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<S: Space> fmt::Debug for Vec2<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(S::NAME)
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}

impl<S: Space> Add for Vec2<S> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        add(self, rhs)
    }
}

impl<S: Space> Sub for Vec2<S> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        subtract(self, rhs)
    }
}

impl<S: Space> Neg for Vec2<S> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl<S: Space> Mul<f64> for Vec2<S> {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl<S: Space> Div<f64> for Vec2<S> {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

// ── Component-wise operations ───────────────────────────────────

#[must_use]
pub fn add<S: Space>(a: Vec2<S>, b: Vec2<S>) -> Vec2<S> {
    Vec2::new(a.x + b.x, a.y + b.y)
}

#[must_use]
pub fn subtract<S: Space>(a: Vec2<S>, b: Vec2<S>) -> Vec2<S> {
    Vec2::new(a.x - b.x, a.y - b.y)
}

#[must_use]
pub fn multiply<S: Space>(a: Vec2<S>, b: Vec2<S>) -> Vec2<S> {
    Vec2::new(a.x * b.x, a.y * b.y)
}

#[must_use]
pub fn divide<S: Space>(a: Vec2<S>, b: Vec2<S>) -> Vec2<S> {
    Vec2::new(a.x / b.x, a.y / b.y)
}

#[must_use]
pub fn distance<S: Space>(a: Vec2<S>, b: Vec2<S>) -> f64 {
    (a - b).length()
}

#[must_use]
pub fn abs<S: Space>(v: Vec2<S>) -> Vec2<S> {
    Vec2::new(v.x.abs(), v.y.abs())
}

#[must_use]
pub fn min<S: Space>(a: Vec2<S>, b: Vec2<S>) -> Vec2<S> {
    Vec2::new(a.x.min(b.x), a.y.min(b.y))
}

#[must_use]
pub fn max<S: Space>(a: Vec2<S>, b: Vec2<S>) -> Vec2<S> {
    Vec2::new(a.x.max(b.x), a.y.max(b.y))
}

/// `min(max(v, lo), hi)` per component. When `lo > hi` on an axis, `hi` wins.
#[must_use]
pub fn clamp<S: Space>(v: Vec2<S>, lo: Vec2<S>, hi: Vec2<S>) -> Vec2<S> {
    min(max(v, lo), hi)
}

/// Snap each component to the nearest multiple of `step`.
///
/// Halves round toward positive infinity, so `-10` snaps to `0` on a grid of
/// 20. A non-positive or non-finite `step` leaves `v` unchanged.
#[must_use]
pub fn round_to<S: Space>(v: Vec2<S>, step: f64) -> Vec2<S> {
    Vec2::new(round_scalar_to(v.x, step), round_scalar_to(v.y, step))
}

/// Scalar form of [`round_to`].
#[must_use]
pub fn round_scalar_to(value: f64, step: f64) -> f64 {
    if !(step.is_finite() && step > 0.0) {
        return value;
    }
    (value / step + 0.5).floor() * step
}

/// Normalize two arbitrary corners into `(top_left, bottom_right)`.
#[must_use]
pub fn corners<S: Space>(a: Vec2<S>, b: Vec2<S>) -> (Vec2<S>, Vec2<S>) {
    (min(a, b), max(a, b))
}

/// Strict overlap test between two normalized rectangles.
///
/// Rectangles that only share an edge do not intersect, and a zero-area
/// rectangle never intersects anything.
#[must_use]
pub fn intersects<S: Space>(
    a_top_left: Vec2<S>,
    a_bottom_right: Vec2<S>,
    b_top_left: Vec2<S>,
    b_bottom_right: Vec2<S>,
) -> bool {
    a_top_left.x < b_bottom_right.x
        && a_bottom_right.x > b_top_left.x
        && a_top_left.y < b_bottom_right.y
        && a_bottom_right.y > b_top_left.y
}

// ── Rect ────────────────────────────────────────────────────────

/// Axis-aligned rectangle with normalized corners.
#[derive(Clone, Copy, PartialEq)]
pub struct Rect<S: Space> {
    pub top_left: Vec2<S>,
    pub bottom_right: Vec2<S>,
}

impl<S: Space> Rect<S> {
    /// Build from two corners given in any order.
    #[must_use]
    pub fn from_corners(a: Vec2<S>, b: Vec2<S>) -> Self {
        let (top_left, bottom_right) = corners(a, b);
        Self { top_left, bottom_right }
    }

    /// Build from a top-left position and a size.
    #[must_use]
    pub fn from_origin_size(origin: Vec2<S>, size: Vec2<S>) -> Self {
        Self::from_corners(origin, origin + size)
    }

    #[must_use]
    pub fn size(&self) -> Vec2<S> {
        self.bottom_right - self.top_left
    }

    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        intersects(self.top_left, self.bottom_right, other.top_left, other.bottom_right)
    }
}

impl<S: Space> fmt::Debug for Rect<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rect")
            .field("top_left", &self.top_left)
            .field("bottom_right", &self.bottom_right)
            .finish()
    }
}

// ── Space conversions ───────────────────────────────────────────

/// Placement of the tile container in the window, captured once per gesture.
///
/// `origin` is the container's top-left in window space (what
/// `getBoundingClientRect` reports) and `scale` the zoom applied to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerFrame {
    pub origin: WindowVec,
    pub scale: f64,
}

impl Default for ContainerFrame {
    fn default() -> Self {
        Self { origin: WindowVec::zero(), scale: 1.0 }
    }
}

impl ContainerFrame {
    #[must_use]
    pub fn new(origin: WindowVec, scale: f64) -> Self {
        Self { origin, scale }
    }

    #[must_use]
    pub fn window_to_container(&self, point: WindowVec) -> ContainerVec {
        ContainerVec::new(point.x - self.origin.x, point.y - self.origin.y)
    }

    #[must_use]
    pub fn container_to_canvas(&self, point: ContainerVec) -> CanvasVec {
        CanvasVec::new(point.x / self.scale, point.y / self.scale)
    }

    #[must_use]
    pub fn window_to_canvas(&self, point: WindowVec) -> CanvasVec {
        self.container_to_canvas(self.window_to_container(point))
    }

    /// Convert a window-space displacement; the origin does not apply.
    #[must_use]
    pub fn window_delta_to_canvas(&self, delta: WindowVec) -> CanvasVec {
        CanvasVec::new(delta.x / self.scale, delta.y / self.scale)
    }
}
