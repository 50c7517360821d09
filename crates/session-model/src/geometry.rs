//! Geometry types for camera framing.
//!
//! All coordinates are in source pixel space: `(0, 0)` is the top-left of
//! the captured frame and `(width, height)` the bottom-right. Values stay
//! floating point until the compositor samples actual pixels.

use serde::{Deserialize, Serialize};

/// Natural pixel size of the decoded source video.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceSize {
    pub width: f64,
    pub height: f64,
}

impl SourceSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Construct from decoder-reported integer dimensions.
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
        }
    }

    /// The full-frame rectangle for this source.
    pub fn bounds(&self) -> Rect {
        Rect {
            x: 0.0,
            y: 0.0,
            w: self.width,
            h: self.height,
        }
    }

    pub fn aspect(&self) -> f64 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

/// A rectangular region of the source frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge in source pixels.
    pub x: f64,
    /// Top edge in source pixels.
    pub y: f64,
    /// Width in source pixels.
    pub w: f64,
    /// Height in source pixels.
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Create a rect centered at `(cx, cy)`, clamped so it never leaves the
    /// source bounds. Clamping shifts the rect without resizing it; only a
    /// rect larger than the bounds gets shrunk to fit.
    pub fn centered_within(cx: f64, cy: f64, w: f64, h: f64, source: SourceSize) -> Self {
        let w = w.clamp(1.0, source.width.max(1.0));
        let h = h.clamp(1.0, source.height.max(1.0));

        let x = (cx - w / 2.0).clamp(0.0, (source.width - w).max(0.0));
        let y = (cy - h / 2.0).clamp(0.0, (source.height - h).max(0.0));

        Self { x, y, w, h }
    }

    /// The center point of this rect.
    pub fn center(&self) -> Point2D {
        Point2D {
            x: self.x + self.w / 2.0,
            y: self.y + self.h / 2.0,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Effective zoom factor relative to the source (1.0 = full frame).
    pub fn zoom_factor(&self, source: SourceSize) -> f64 {
        if self.w > 0.0 {
            source.width / self.w
        } else {
            1.0
        }
    }

    /// Check whether a point lies within this rect.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// Whether this rect lies fully inside the source bounds.
    pub fn within(&self, source: SourceSize) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= source.width + 1e-9
            && self.bottom() <= source.height + 1e-9
    }

    /// Linearly interpolate each component between two rects.
    pub fn lerp(a: &Rect, b: &Rect, t: f64) -> Rect {
        let t = t.clamp(0.0, 1.0);
        Rect {
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
            w: a.w + (b.w - a.w) * t,
            h: a.h + (b.h - a.h) * t,
        }
    }

    /// Area in square pixels.
    pub fn area(&self) -> f64 {
        self.w * self.h
    }
}

/// A 2D point in source pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Linear interpolation between two points.
    pub fn lerp(a: &Point2D, b: &Point2D, t: f64) -> Point2D {
        let t = t.clamp(0.0, 1.0);
        Point2D {
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
        }
    }
}
