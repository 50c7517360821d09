//! Temporal interpolation between sparse keyframes.
//!
//! Keyframes arrive at the cursor sampling rate (~60Hz); output frames may
//! land anywhere between them, and the output frame rate need not match.
//! Smoothstep easing across the bracketing pair keeps the virtual camera
//! from popping at keyframe boundaries.

use camglide_session_model::{Rect, SourceSize, ZoomKeyframe};

use crate::easing::smoothstep;

/// The viewport at time `t` for a keyframe trajectory.
///
/// Boundary behavior: an empty list yields the full source rect; `t` at or
/// before the first keyframe yields the first rect, at or after the last
/// the last rect. In between, the bracketing pair is found by binary search
/// and x/y/w/h are interpolated independently with smoothstep easing.
/// Total for any input; equal-timestamp neighbors resolve to the earlier
/// keyframe's rect.
pub fn interpolated_rect(keyframes: &[ZoomKeyframe], t: f64, source: SourceSize) -> Rect {
    let (first, last) = match (keyframes.first(), keyframes.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return source.bounds(),
    };
    if t <= first.time {
        return first.viewport;
    }
    if t >= last.time {
        return last.viewport;
    }

    // First index with time > t; the bracketing pair is (idx - 1, idx).
    // The boundary checks above guarantee 1 <= idx < len.
    let idx = keyframes.partition_point(|k| k.time <= t);
    let lo = &keyframes[idx - 1];
    let hi = &keyframes[idx];

    let span = hi.time - lo.time;
    if span <= 0.0 {
        return lo.viewport;
    }

    let s = smoothstep((t - lo.time) / span);
    Rect::lerp(&lo.viewport, &hi.viewport, s)
}
