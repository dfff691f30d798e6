//! Quaternion helpers for drag rotation.
//!
//! Rotations are exchanged with the projection as three Euler-like angles in
//! degrees (`[lambda, phi, gamma]`, the same convention the projection's
//! `rotate` uses). Composition happens on unit quaternions so that dragging
//! never hits gimbal lock near the poles.

#[cfg(test)]
#[path = "versor_test.rs"]
mod versor_test;

use glam::{DQuat, DVec3};

use crate::geo::Position;

/// Projection rotation in degrees: `[lambda, phi, gamma]`.
pub type Rotation = [f64; 3];

/// Unit vector for a longitude/latitude position.
#[must_use]
pub fn cartesian(p: Position) -> DVec3 {
    let (lon, lat) = (p.lon.to_radians(), p.lat.to_radians());
    let cos_lat = lat.cos();
    DVec3::new(cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin())
}

/// Quaternion equivalent of a projection rotation.
#[must_use]
pub fn from_rotation(r: Rotation) -> DQuat {
    let (sl, cl) = (r[0].to_radians() / 2.0).sin_cos();
    let (sp, cp) = (r[1].to_radians() / 2.0).sin_cos();
    let (sg, cg) = (r[2].to_radians() / 2.0).sin_cos();
    DQuat::from_xyzw(
        sl * cp * cg - cl * sp * sg,
        cl * sp * cg + sl * cp * sg,
        cl * cp * sg - sl * sp * cg,
        cl * cp * cg + sl * sp * sg,
    )
}

/// Projection rotation equivalent of a quaternion.
#[must_use]
pub fn to_rotation(q: DQuat) -> Rotation {
    let (a, b, c, d) = (q.w, q.x, q.y, q.z);
    [
        (2.0 * (a * b + c * d)).atan2(1.0 - 2.0 * (b * b + c * c)).to_degrees(),
        (2.0 * (a * c - d * b)).clamp(-1.0, 1.0).asin().to_degrees(),
        (2.0 * (a * d + b * c)).atan2(1.0 - 2.0 * (c * c + d * d)).to_degrees(),
    ]
}

/// Shortest-arc rotation carrying unit vector `from` onto `to`.
///
/// Parallel vectors yield the identity.
#[must_use]
pub fn delta(from: DVec3, to: DVec3) -> DQuat {
    let axis = from.cross(to);
    let len = axis.length();
    if len == 0.0 {
        return DQuat::IDENTITY;
    }
    let half = from.dot(to).clamp(-1.0, 1.0).acos() / 2.0;
    let (s, c) = half.sin_cos();
    DQuat::from_xyzw(axis.z / len * s, -axis.y / len * s, axis.x / len * s, c)
}

/// Apply `then` after `first`.
#[must_use]
pub fn compose(first: DQuat, then: DQuat) -> DQuat {
    first * then
}
