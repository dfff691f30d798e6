//! Drag rotation of the globe.
//!
//! The point grabbed at drag start stays under the pointer: each drag update
//! computes the shortest-arc rotation between the grabbed sphere point and the
//! sphere point now under the pointer (both read with the rotation captured at
//! drag start) and composes it onto the starting rotation. Because every
//! update is relative to the captured start, the result only depends on where
//! the drag began and where the pointer is now.

#[cfg(test)]
#[path = "rotation_test.rs"]
mod rotation_test;

use glam::{DQuat, DVec3};

use crate::projection::Orthographic;
use crate::versor::{self, Rotation};
use crate::viewport::Point;

/// State captured when a drag starts.
#[derive(Debug, Clone, Copy)]
struct DragAnchor {
    rotate: Rotation,
    quat: DQuat,
    grabbed: DVec3,
}

/// Converts pointer positions into projection rotations.
#[derive(Debug, Clone, Default)]
pub struct RotationTracker {
    anchor: Option<DragAnchor>,
}

impl RotationTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current rotation and the sphere point under `screen`.
    ///
    /// Returns `false` (and captures nothing) when `screen` is off the sphere.
    pub fn begin_drag(&mut self, projection: &Orthographic, screen: Point) -> bool {
        self.anchor = projection.invert(screen).map(|grabbed| {
            let rotate = projection.rotate();
            DragAnchor { rotate, quat: versor::from_rotation(rotate), grabbed: versor::cartesian(grabbed) }
        });
        self.anchor.is_some()
    }

    /// Rotate `projection` so the grabbed point follows `screen`.
    ///
    /// Returns whether the projection was changed. A drag that started off the
    /// sphere anchors on the first point that lands on it; points off the
    /// sphere leave the last rotation in place.
    pub fn continue_drag(&mut self, projection: &mut Orthographic, screen: Point) -> bool {
        let Some(anchor) = self.anchor else {
            self.begin_drag(projection, screen);
            return false;
        };
        let Some(current) = projection.with_rotate(anchor.rotate).invert(screen) else {
            return false;
        };
        let turn = versor::delta(anchor.grabbed, versor::cartesian(current));
        let rotate = versor::to_rotation(versor::compose(anchor.quat, turn));
        if rotate.iter().any(|a| !a.is_finite()) {
            return false;
        }
        projection.set_rotate(rotate);
        true
    }

    /// Forget the captured drag state.
    pub fn end_drag(&mut self) {
        self.anchor = None;
    }

    /// Whether a drag anchor is held.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.anchor.is_some()
    }
}
