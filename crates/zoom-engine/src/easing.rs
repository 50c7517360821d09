//! Easing curves shared by the zoom phases and keyframe interpolation.
//!
//! All functions clamp their parameter to `[0, 1]` so callers never have to
//! pre-guard against slightly-out-of-range phase math.

/// Cubic ease-out: fast start, gentle landing. Used for the zoom-in ramp.
pub fn ease_out_cubic(p: f64) -> f64 {
    let p = clamp01(p);
    1.0 - (1.0 - p).powi(3)
}

/// Cubic ease-in: gentle start, fast finish. Used for the zoom-out decay.
pub fn ease_in_cubic(p: f64) -> f64 {
    clamp01(p).powi(3)
}

/// Hermite smoothstep `t²(3 − 2t)`: zero slope at both ends, so values and
/// first derivatives meet at segment boundaries.
pub fn smoothstep(t: f64) -> f64 {
    let t = clamp01(t);
    t * t * (3.0 - 2.0 * t)
}

/// Linear interpolation, unclamped in value, clamped in `t`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * clamp01(t)
}

fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}
