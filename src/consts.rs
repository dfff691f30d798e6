//! Shared numeric constants for the globe crate.

// ── Projection ──────────────────────────────────────────────────

/// Scale of a freshly created orthographic projection, before fitting.
pub const DEFAULT_SCALE: f64 = 249.5;

/// Translate of a freshly created orthographic projection, before fitting.
pub const DEFAULT_TRANSLATE: (f64, f64) = (480.0, 250.0);

/// Tolerance for screen points that sit right on the sphere's rim.
pub const RIM_EPSILON: f64 = 1e-9;

/// Segments used to trace the full horizon circle (6° each).
pub const HORIZON_SEGMENTS: u32 = 60;

// ── Zoom ────────────────────────────────────────────────────────

/// Default allowed range for the zoom factor `k`.
pub const DEFAULT_SCALE_EXTENT: [f64; 2] = [1.0, 8.0];

/// Wheel delta multiplier for pixel-mode wheel events.
pub const WHEEL_PIXEL_FACTOR: f64 = 0.002;

/// Wheel delta multiplier for line-mode wheel events.
pub const WHEEL_LINE_FACTOR: f64 = 0.05;

/// Wheel delta multiplier for page-mode wheel events.
pub const WHEEL_PAGE_FACTOR: f64 = 1.0;

/// Quiet period after the last wheel event before the zoom gesture ends.
pub const WHEEL_END_DELAY_MS: u32 = 150;

// ── Rendering ───────────────────────────────────────────────────

/// Stroke width of country boundaries, in canvas pixels.
pub const BOUNDARY_LINE_WIDTH: f64 = 0.5;

/// Stroke width of the sphere outline, in canvas pixels.
pub const SPHERE_LINE_WIDTH: f64 = 1.0;
