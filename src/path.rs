//! Projected country paths and point-in-path hit-testing.
//!
//! Geometry is projected ring by ring. Parts of a ring on the far side of the
//! globe are cut at the horizon and the gap is bridged along the horizon
//! circle, so every projected ring is closed and lies inside the visible
//! disk. Hit-testing uses the even-odd rule, the same rule the renderer fills
//! with, so what is painted is exactly what is hoverable.

#[cfg(test)]
#[path = "path_test.rs"]
mod path_test;

use std::f64::consts::{PI, TAU};

use glam::DVec3;

use crate::consts::HORIZON_SEGMENTS;
use crate::geo::{Geometry, Position};
use crate::projection::Orthographic;
use crate::viewport::Point;

/// Axis-aligned bounds in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
}

/// A set of closed rings in canvas space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedPath {
    rings: Vec<Vec<Point>>,
    bounds: Option<Bounds>,
}

impl ProjectedPath {
    #[must_use]
    pub fn new(rings: Vec<Vec<Point>>) -> Self {
        let bounds = rings
            .iter()
            .flatten()
            .map(|p| Bounds { min: *p, max: *p })
            .reduce(Bounds::union);
        Self { rings, bounds }
    }

    #[must_use]
    pub fn rings(&self) -> &[Vec<Point>] {
        &self.rings
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Even-odd containment test against all rings.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        if !self.bounds.is_some_and(|b| b.contains(p)) {
            return false;
        }
        let crossings = self.rings.iter().filter(|ring| ring_crosses(ring, p)).count();
        crossings % 2 == 1
    }
}

// Odd number of edge crossings on a ray cast to the right of `p`.
fn ring_crosses(ring: &[Point], p: Point) -> bool {
    let mut inside = false;
    let mut j = ring.len().wrapping_sub(1);
    for (i, a) in ring.iter().enumerate() {
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Project every polygon ring of `geometry`, clipping at the horizon.
#[must_use]
pub fn project_geometry(projection: &Orthographic, geometry: &Geometry) -> ProjectedPath {
    let rings = geometry
        .polygons()
        .into_iter()
        .flatten()
        .filter_map(|ring| clip_ring(projection, ring))
        .collect();
    ProjectedPath::new(rings)
}

/// Project a single ring. Returns `None` when nothing of it is visible.
///
/// Each run of hidden vertices is replaced by its two horizon crossings joined
/// along the shorter arc of the horizon circle.
fn clip_ring(projection: &Orthographic, ring: &[Position]) -> Option<Vec<Point>> {
    let ring = match ring {
        [first, .., last] if first == last => &ring[..ring.len() - 1],
        _ => ring,
    };
    if ring.len() < 3 {
        return None;
    }

    let views: Vec<DVec3> = ring.iter().map(|p| projection.to_view(*p)).collect();
    let start = views.iter().position(|v| v.x > 0.0)?;
    if views.iter().all(|v| v.x > 0.0) {
        return Some(views.iter().map(|v| projection.view_to_screen(*v)).collect());
    }

    let n = views.len();
    let mut out = Vec::with_capacity(n + 8);
    let mut exit: Option<Point> = None;
    for step in 0..n {
        let a = views[(start + step) % n];
        let b = views[(start + step + 1) % n];
        let (a_visible, b_visible) = (a.x > 0.0, b.x > 0.0);
        if a_visible {
            out.push(projection.view_to_screen(a));
        }
        match (a_visible, b_visible) {
            (true, false) => {
                let p = horizon_crossing(projection, a, b);
                out.push(p);
                exit = Some(p);
            }
            (false, true) => {
                let p = horizon_crossing(projection, b, a);
                if let Some(from) = exit.take() {
                    push_horizon_arc(projection, from, p, &mut out);
                }
                out.push(p);
            }
            _ => {}
        }
    }
    Some(out)
}

// Where the great-circle arc from visible `front` to hidden `back` meets the horizon.
fn horizon_crossing(projection: &Orthographic, front: DVec3, back: DVec3) -> Point {
    let t = front.x / (front.x - back.x);
    let p = front + (back - front) * t;
    let len = (p.y * p.y + p.z * p.z).sqrt();
    if len == 0.0 {
        return projection.view_to_screen(front);
    }
    projection.view_to_screen(DVec3::new(0.0, p.y / len, p.z / len))
}

// Intermediate horizon points strictly between `from` and `to`, shorter way round.
fn push_horizon_arc(projection: &Orthographic, from: Point, to: Point, out: &mut Vec<Point>) {
    let start = projection.horizon_angle(from);
    let mut sweep = projection.horizon_angle(to) - start;
    if sweep > PI {
        sweep -= TAU;
    } else if sweep < -PI {
        sweep += TAU;
    }
    let step = TAU / f64::from(HORIZON_SEGMENTS);
    let mut travelled = step;
    while travelled < sweep.abs() {
        out.push(projection.horizon_point(start + travelled.copysign(sweep)));
        travelled += step;
    }
}
