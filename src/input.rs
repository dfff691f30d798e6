//! Input model: interaction modes, resolution tiers and gesture records.
//!
//! Pointer and wheel callbacks arrive as plain client coordinates. They are
//! wrapped in typed records here before reaching the state machine in
//! [`crate::engine`], which owns the transitions between modes.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::viewport::Point;

/// Which gesture, if any, is in progress. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// No gesture; full resolution, hover enabled.
    #[default]
    Idle,
    /// The globe is being rotated by a pointer drag.
    Dragging,
    /// A wheel or pinch zoom is in progress.
    Zooming,
}

impl InteractionMode {
    /// The geometry tier used for rendering and hit-testing in this mode.
    ///
    /// This is the only place the resolution choice is made.
    #[must_use]
    pub fn tier(self) -> Tier {
        match self {
            Self::Idle => Tier::High,
            Self::Dragging | Self::Zooming => Tier::Low,
        }
    }

    /// Whether a drag or zoom gesture is in progress.
    #[must_use]
    pub fn is_active(self) -> bool {
        self != Self::Idle
    }
}

/// Geometry resolution tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Coarse geometry, used while interacting.
    Low,
    /// Fine geometry, used at rest.
    High,
}

impl Tier {
    /// Slot index for per-tier arrays.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Low => 0,
            Self::High => 1,
        }
    }
}

/// A pointer event in client coordinates together with the canvas origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Pointer position relative to the page viewport.
    pub client: Point,
    /// Top-left corner of the canvas' bounding box in the same space.
    pub origin: Point,
}

impl PointerEvent {
    #[must_use]
    pub fn new(client: Point, origin: Point) -> Self {
        Self { client, origin }
    }

    /// Pointer position relative to the canvas' top-left corner.
    #[must_use]
    pub fn local(&self) -> Point {
        Point::new(self.client.x - self.origin.x, self.client.y - self.origin.y)
    }
}

/// Unit of a wheel delta, as reported by the browser's `deltaMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

impl DeltaMode {
    /// Map the DOM `deltaMode` code; unknown codes count as pixels.
    #[must_use]
    pub fn from_dom(code: u32) -> Self {
        match code {
            1 => Self::Line,
            2 => Self::Page,
            _ => Self::Pixel,
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelDelta {
    /// Horizontal scroll amount.
    pub dx: f64,
    /// Vertical scroll amount (positive = down = zoom out).
    pub dy: f64,
    pub mode: DeltaMode,
}

impl WheelDelta {
    #[must_use]
    pub fn pixels(dy: f64) -> Self {
        Self { dx: 0.0, dy, mode: DeltaMode::Pixel }
    }
}
