//! Orthographic projection of the unit sphere onto the canvas.
//!
//! Rotation follows the usual `[lambda, phi, gamma]` convention in degrees:
//! lambda spins about the polar axis, then phi and gamma tilt the result.
//! After rotation, the point `(0°, 0°)` faces the viewer and sits at the
//! projection's translate. Every mutation bumps [`Orthographic::revision`] so
//! cached paths can tell when they went stale.

#[cfg(test)]
#[path = "projection_test.rs"]
mod projection_test;

use glam::DVec3;

use crate::consts::{DEFAULT_SCALE, DEFAULT_TRANSLATE, HORIZON_SEGMENTS, RIM_EPSILON};
use crate::geo::{Geometry, Position};
use crate::path::{self, Bounds, ProjectedPath};
use crate::versor::Rotation;
use crate::viewport::Point;

/// Orthographic projection state.
#[derive(Debug, Clone, PartialEq)]
pub struct Orthographic {
    rotate: Rotation,
    scale: f64,
    translate: Point,
    revision: u64,
}

impl Default for Orthographic {
    fn default() -> Self {
        Self {
            rotate: [0.0, 0.0, 0.0],
            scale: DEFAULT_SCALE,
            translate: Point::new(DEFAULT_TRANSLATE.0, DEFAULT_TRANSLATE.1),
            revision: 0,
        }
    }
}

impl Orthographic {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- State ---

    #[must_use]
    pub fn rotate(&self) -> Rotation {
        self.rotate
    }

    pub fn set_rotate(&mut self, rotate: Rotation) {
        self.rotate = rotate;
        self.bump();
    }

    /// Sphere radius in canvas pixels.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
        self.bump();
    }

    /// Canvas position of the sphere's center.
    #[must_use]
    pub fn translate(&self) -> Point {
        self.translate
    }

    pub fn set_translate(&mut self, translate: Point) {
        self.translate = translate;
        self.bump();
    }

    /// Monotonic counter, bumped on every mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// A copy with a different rotation, for probing without mutating.
    #[must_use]
    pub fn with_rotate(&self, rotate: Rotation) -> Self {
        Self { rotate, ..self.clone() }
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    // --- Fitting ---

    /// Scale and center the projection so `geometries` fill a `width` x `height`
    /// canvas under the current rotation.
    ///
    /// Falls back to fitting the whole sphere when nothing is visible.
    pub fn fit_size<'a>(&mut self, width: f64, height: f64, geometries: impl IntoIterator<Item = &'a Geometry>) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let unit = Self { scale: 1.0, translate: Point::new(0.0, 0.0), ..self.clone() };
        let bounds = geometries
            .into_iter()
            .filter_map(|g| path::project_geometry(&unit, g).bounds())
            .reduce(Bounds::union)
            .filter(|b| b.width() > 0.0 && b.height() > 0.0)
            .unwrap_or(Bounds { min: Point::new(-1.0, -1.0), max: Point::new(1.0, 1.0) });

        let k = (width / bounds.width()).min(height / bounds.height());
        self.scale = k;
        self.translate = Point::new(
            (width - k * (bounds.max.x + bounds.min.x)) / 2.0,
            (height - k * (bounds.max.y + bounds.min.y)) / 2.0,
        );
        self.bump();
    }

    // --- Forward / inverse ---

    /// Rotated unit vector of a position: `x` is depth toward the viewer,
    /// `y` and `z` are the horizontal and vertical screen axes.
    #[must_use]
    pub fn to_view(&self, p: Position) -> DVec3 {
        let [dl, dp, dg] = self.rotate.map(f64::to_radians);
        let (lon, lat) = (p.lon.to_radians() + dl, p.lat.to_radians());
        let cos_lat = lat.cos();
        let (x, y, z) = (lon.cos() * cos_lat, lon.sin() * cos_lat, lat.sin());
        let (sin_p, cos_p) = dp.sin_cos();
        let (sin_g, cos_g) = dg.sin_cos();
        let k = z * cos_p + x * sin_p;
        DVec3::new(x * cos_p - z * sin_p, y * cos_g - k * sin_g, k * cos_g + y * sin_g)
    }

    /// Canvas position of a rotated view vector, ignoring visibility.
    #[must_use]
    pub fn view_to_screen(&self, v: DVec3) -> Point {
        Point::new(self.translate.x + self.scale * v.y, self.translate.y - self.scale * v.z)
    }

    /// Canvas position of `p`, or `None` on the far hemisphere.
    #[must_use]
    pub fn project(&self, p: Position) -> Option<Point> {
        let v = self.to_view(p);
        (v.x > 0.0).then(|| self.view_to_screen(v))
    }

    /// Position under canvas point `screen`, or `None` outside the sphere's disk.
    #[must_use]
    pub fn invert(&self, screen: Point) -> Option<Position> {
        if self.scale == 0.0 {
            return None;
        }
        let sx = (screen.x - self.translate.x) / self.scale;
        let sy = (self.translate.y - screen.y) / self.scale;
        let r2 = sx * sx + sy * sy;
        if !r2.is_finite() || r2 > 1.0 + RIM_EPSILON {
            return None;
        }
        let depth = (1.0 - r2).max(0.0).sqrt();

        let [dl, dp, dg] = self.rotate.map(f64::to_radians);
        let (sin_p, cos_p) = dp.sin_cos();
        let (sin_g, cos_g) = dg.sin_cos();
        let k = sy * cos_g - sx * sin_g;
        let lon = (sx * cos_g + sy * sin_g).atan2(depth * cos_p + k * sin_p) - dl;
        let lat = (k * cos_p - depth * sin_p).clamp(-1.0, 1.0).asin();
        Some(Position::new(wrap_degrees(lon.to_degrees()), lat.to_degrees()))
    }

    // --- Horizon ---

    /// Canvas point on the horizon circle at `angle` radians (screen orientation).
    #[must_use]
    pub fn horizon_point(&self, angle: f64) -> Point {
        let (s, c) = angle.sin_cos();
        Point::new(self.translate.x + self.scale * c, self.translate.y + self.scale * s)
    }

    /// Screen angle of a canvas point around the sphere's center.
    #[must_use]
    pub fn horizon_angle(&self, p: Point) -> f64 {
        (p.y - self.translate.y).atan2(p.x - self.translate.x)
    }

    /// Outline of the visible disk, used for the water fill and the rim stroke.
    #[must_use]
    pub fn sphere_path(&self) -> ProjectedPath {
        let step = std::f64::consts::TAU / f64::from(HORIZON_SEGMENTS);
        let ring = (0..HORIZON_SEGMENTS)
            .map(|i| self.horizon_point(f64::from(i) * step))
            .collect();
        ProjectedPath::new(vec![ring])
    }
}

/// Wrap a longitude into `[-180, 180]`.
fn wrap_degrees(deg: f64) -> f64 {
    if deg.abs() > 180.0 { deg - (deg / 360.0).round() * 360.0 } else { deg }
}
