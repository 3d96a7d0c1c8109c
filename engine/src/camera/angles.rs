//! Angle Helpers
//!
//! Degree-based helpers for the head rig. Euler angles are kept in degrees
//! because the desk tuning values (cone bounds, down angle, tilt) are authored
//! in degrees.
//!
//! All blends go through [`smoothing_factor`], which turns elapsed time and a
//! rate constant into a clamped interpolation factor. Angular blends use
//! [`lerp_angle`] so they take the short way around the 0/360 seam.

/// Wrap an angle into `[0, 360)`.
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Wrap an angle into `(-180, 180]`.
#[inline]
pub fn signed_degrees(angle: f32) -> f32 {
    let wrapped = normalize_degrees(angle);
    if wrapped > 180.0 { wrapped - 360.0 } else { wrapped }
}

/// Shortest signed difference from `current` to `target`, in `(-180, 180]`.
#[inline]
pub fn delta_angle(current: f32, target: f32) -> f32 {
    signed_degrees(target - current)
}

/// Linear interpolation with `t` clamped to `[0, 1]`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Interpolate between two angles along the shortest arc.
///
/// `t` is clamped to `[0, 1]`. The result is not re-wrapped, so a blend from
/// 350 toward 10 passes through 360 rather than sweeping back through 180.
#[inline]
pub fn lerp_angle(a: f32, b: f32, t: f32) -> f32 {
    a + delta_angle(a, b) * t.clamp(0.0, 1.0)
}

/// Frame-rate independent blend factor: `elapsed * rate`, clamped to `[0, 1]`.
#[inline]
pub fn smoothing_factor(dt: f32, rate: f32) -> f32 {
    (dt * rate).clamp(0.0, 1.0)
}

/// Whether `angle` lies inside the inclusive arc from `min` to `max`.
///
/// The arc may wrap through 0 (e.g. `min = 330`, `max = 30`). A span of 360
/// degrees or more accepts every angle; bounds that normalize to the same
/// value accept only that angle.
pub fn angle_in_range(angle: f32, min: f32, max: f32) -> bool {
    if (max - min).abs() >= 360.0 {
        return true;
    }

    let angle = normalize_degrees(angle);
    let min = normalize_degrees(min);
    let max = normalize_degrees(max);

    if min < max {
        angle >= min && angle <= max
    } else if min > max {
        angle >= min || angle <= max
    } else {
        delta_angle(angle, min).abs() <= 1e-4
    }
}

/// Clamp an angle to `[min, max]` after bringing it into signed form.
///
/// Used for free-look pitch so the head cannot bend backwards.
#[inline]
pub fn restrict_angle(angle: f32, min: f32, max: f32) -> f32 {
    signed_degrees(angle).clamp(min, max)
}
