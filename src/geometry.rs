// =============================================================================
// GEOMETRY.RS — Small 2D helpers used by the camera
//
// - Linear interpolation (the per-frame easing used for every camera channel)
// - Axis-aligned region tests that don't care which corners were given
// - Rotation of a point around a pivot
// =============================================================================

use glam::Vec2;

/// Linear interpolation from `a` toward `b` by `t`.
///
/// Applied once per frame this gives exponential-style easing: the camera
/// covers a fixed fraction of the remaining distance every update.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Component-wise [`lerp`] for vectors.
#[inline]
pub fn lerp_vec2(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    Vec2::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

// =============================================================================
// REGIONS
// =============================================================================

/// Normalise two opposite corners into `(min, max)`.
///
/// Either corner may be the upper-left or the lower-right one.
#[inline]
pub fn region_bounds(a: Vec2, b: Vec2) -> (Vec2, Vec2) {
    (a.min(b), a.max(b))
}

/// Is `point` inside the rectangle spanned by the opposite corners `a` and `b`?
///
/// Edges count as inside. Corner order does not matter, so
/// `within_region(p, a, b) == within_region(p, b, a)` for every input.
pub fn within_region(point: Vec2, a: Vec2, b: Vec2) -> bool {
    let (min, max) = region_bounds(a, b);
    point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
}

// =============================================================================
// ROTATION
// =============================================================================

/// Rotate `point` by `angle` radians around `pivot`.
///
/// Positive angles turn clockwise on a y-down screen, matching how the
/// render context's `rotate` behaves.
pub fn rotate_about(point: Vec2, pivot: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    let d = point - pivot;
    pivot + Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}
