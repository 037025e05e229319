//! Angle helpers in degrees.
//!
//! Every function is continuous across the wrap boundary: interpolating or
//! diffing angles on either side of 0/360 never takes the long way around.

use crate::Vec2;

/// Wrap into `[0, 360)`.
pub fn normalize_360(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}

/// Wrap into `(-180, 180]`.
pub fn normalize_180(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Shortest signed delta from `from` to `to`.
///
/// `diff(350.0, 10.0) == 20.0`, not `-340.0`. Ties at the half-turn resolve
/// to `+180`.
pub fn diff(from: f32, to: f32) -> f32 {
    normalize_180(to - from)
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate along the shortest arc between two headings.
pub fn lerp_360(a: f32, b: f32, t: f32) -> f32 {
    normalize_360(a + diff(a, b) * t)
}

/// Heading of a direction vector in `[0, 360)`, with 0 along `+x` and angles
/// growing counter-clockwise. A zero vector reports 0.
pub fn from_direction(dir: Vec2) -> f32 {
    if dir == Vec2::ZERO {
        return 0.0;
    }
    normalize_360(dir.y.atan2(dir.x).to_degrees())
}

/// Unit direction vector for a heading in degrees.
pub fn to_direction(angle: f32) -> Vec2 {
    let radians = angle.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}
