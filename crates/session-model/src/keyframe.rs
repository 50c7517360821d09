//! Zoom keyframes: the virtual camera trajectory over the source frame.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// A timestamped viewport sample of the virtual camera.
///
/// Produced once per session by the zoom engine in non-decreasing time
/// order, immutable afterward, and shared read-only across concurrent
/// compositing calls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomKeyframe {
    /// Seconds since session start.
    pub time: f64,

    /// Visible sub-rectangle of the source frame at this instant.
    pub viewport: Rect,
}

impl ZoomKeyframe {
    pub fn new(time: f64, viewport: Rect) -> Self {
        Self { time, viewport }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyframe_roundtrip() {
        let kf = ZoomKeyframe::new(2.5, Rect::new(100.0, 50.0, 960.0, 540.0));
        let json = serde_json::to_string(&kf).unwrap();
        let parsed: ZoomKeyframe = serde_json::from_str(&json).unwrap();
        assert_eq!(kf, parsed);
    }
}
