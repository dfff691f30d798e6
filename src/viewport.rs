//! Pan/zoom state for the canvas and its boundary clamp.
//!
//! `Transform` maps projection space onto the canvas as translate-then-scale:
//! `screen = projected * k + (x, y)`. The clamp keeps the scaled content
//! covering the canvas so no empty space can be panned into view.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::consts::{DEFAULT_SCALE_EXTENT, WHEEL_LINE_FACTOR, WHEEL_PAGE_FACTOR};
use crate::input::{DeltaMode, WheelDelta};

/// A point in canvas or projection space, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Zoom transform: scale `k` then translate by `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self { k: 1.0, x: 0.0, y: 0.0 }
    }
}

impl Transform {
    #[must_use]
    pub fn new(k: f64, x: f64, y: f64) -> Self {
        Self { k, x, y }
    }

    /// Map a canvas point back into projection space.
    #[must_use]
    pub fn invert(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.x) / self.k,
            y: (screen.y - self.y) / self.k,
        }
    }

    /// Map a projection-space point onto the canvas.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: p.x * self.k + self.x,
            y: p.y * self.k + self.y,
        }
    }
}

/// Clamp the translate of `t` so the scaled content still covers a
/// `width` x `height` canvas.
///
/// For each axis the allowed range is `[-(dimension * (k - 1)), 0]`. A zero
/// dimension leaves the transform untouched.
#[must_use]
pub fn restrict_transform(t: Transform, width: f64, height: f64) -> Transform {
    if width == 0.0 || height == 0.0 {
        return t;
    }
    Transform {
        k: t.k,
        x: clamp_axis(t.x, -(width * (t.k - 1.0))),
        y: clamp_axis(t.y, -(height * (t.k - 1.0))),
    }
}

// Lower bound wins when k < 1 pushes it above zero.
fn clamp_axis(value: f64, min: f64) -> f64 {
    if value < min {
        min
    } else if value > 0.0 {
        0.0
    } else {
        value
    }
}

/// Propose the transform a wheel event asks for, zooming about `anchor`.
///
/// `k` grows by `2^(-dy * factor)`; the point under `anchor` stays put.
#[must_use]
pub fn wheel_transform(current: Transform, anchor: Point, delta: WheelDelta, sensitivity: f64) -> Transform {
    let factor = match delta.mode {
        DeltaMode::Pixel => sensitivity,
        DeltaMode::Line => WHEEL_LINE_FACTOR,
        DeltaMode::Page => WHEEL_PAGE_FACTOR,
    };
    let k = current.k * (-delta.dy * factor).exp2();
    let fixed = current.invert(anchor);
    Transform {
        k,
        x: anchor.x - fixed.x * k,
        y: anchor.y - fixed.y * k,
    }
}

/// Pan/zoom state driven by zoom gestures.
#[derive(Debug, Clone)]
pub struct ViewportTransform {
    transform: Transform,
    scale_extent: [f64; 2],
    width: f64,
    height: f64,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE_EXTENT)
    }
}

impl ViewportTransform {
    #[must_use]
    pub fn new(scale_extent: [f64; 2]) -> Self {
        Self {
            transform: Transform::default(),
            scale_extent,
            width: 0.0,
            height: 0.0,
        }
    }

    /// Update the canvas size used by the boundary clamp and re-clamp.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.transform = restrict_transform(self.transform, width, height);
    }

    #[must_use]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Accept a proposed transform: clamp `k` to the scale extent, then clamp
    /// the translate to the canvas bounds. Returns the applied transform.
    pub fn on_zoom(&mut self, proposed: Transform) -> Transform {
        let k = self.clamp_scale(proposed.k);
        self.transform = restrict_transform(Transform { k, ..proposed }, self.width, self.height);
        self.transform
    }

    /// Accept a proposed scale only, leaving the translate at the origin.
    /// Used when zoom drives the projection scale instead of the canvas.
    pub fn on_scale(&mut self, k: f64) -> f64 {
        let k = self.clamp_scale(k);
        self.transform = Transform { k, x: 0.0, y: 0.0 };
        k
    }

    fn clamp_scale(&self, k: f64) -> f64 {
        let [min, max] = self.scale_extent;
        if k.is_nan() { self.transform.k } else { k.clamp(min, max) }
    }
}
