//! Reduced-rate live preview.
//!
//! Preview rendering happens opportunistically while capture or playback
//! is running: only every n-th captured frame is composited, at a reduced
//! canvas size, and delivery is last-value-wins through `PreviewSlot` so
//! a slow consumer sees the newest frame instead of a growing queue.

use std::sync::{Mutex, MutexGuard, PoisonError};

use camglide_common::CamglideResult;
use camglide_session_model::{CursorSample, ExportSettings, SourceSize};
use image::RgbaImage;

use crate::compositor::{compose_frame, SourceFrame};
use crate::session::RenderSession;

/// Default sampling stride: composite every 6th captured frame.
pub const DEFAULT_PREVIEW_STRIDE: u64 = 6;

/// Strided compositor over a reduced-resolution session.
#[derive(Debug)]
pub struct PreviewRenderer {
    session: RenderSession,
    stride: u64,
    seen: u64,
}

impl PreviewRenderer {
    /// Build a preview renderer from export settings.
    ///
    /// `scale` shrinks the canvas and style lengths (see
    /// `ExportSettings::scaled`); the cursor log and source size are the
    /// same ones the export would use, so the preview camera matches the
    /// exported camera exactly.
    pub fn new(
        settings: &ExportSettings,
        scale: f64,
        source: SourceSize,
        samples: &[CursorSample],
    ) -> CamglideResult<Self> {
        let session = RenderSession::new(settings.scaled(scale), source, samples)?;
        Ok(Self {
            session,
            stride: DEFAULT_PREVIEW_STRIDE,
            seen: 0,
        })
    }

    pub fn with_stride(mut self, stride: u64) -> Self {
        self.stride = stride.max(1);
        self
    }

    /// Offer a captured frame. Frames between strides are skipped cheaply
    /// without touching pixels; every stride-th frame is composited.
    pub fn offer(&mut self, frame: &SourceFrame) -> CamglideResult<Option<RgbaImage>> {
        let due = self.seen % self.stride == 0;
        self.seen += 1;
        if !due {
            return Ok(None);
        }
        compose_frame(&self.session, frame).map(Some)
    }

    pub fn session(&self) -> &RenderSession {
        &self.session
    }
}

/// A composited preview frame ready for display.
#[derive(Debug, Clone)]
pub struct PreviewFrame {
    /// Source presentation time of the frame.
    pub timestamp: f64,

    /// Composited canvas at preview resolution.
    pub pixels: RgbaImage,
}

/// Single-slot, last-value-wins handoff between the preview producer and
/// the display thread.
///
/// Publishing replaces the held frame unless the held frame is newer, so
/// out-of-order completion can never show a stale frame.
#[derive(Debug, Default)]
pub struct PreviewSlot {
    latest: Mutex<Option<PreviewFrame>>,
}

impl PreviewSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a frame. Returns false and keeps the held frame when the
    /// offered one is older.
    pub fn publish(&self, frame: PreviewFrame) -> bool {
        let mut slot = self.guard();
        match slot.as_ref() {
            Some(held) if held.timestamp > frame.timestamp => false,
            _ => {
                *slot = Some(frame);
                true
            }
        }
    }

    /// Take the newest frame, leaving the slot empty.
    pub fn take(&self) -> Option<PreviewFrame> {
        self.guard().take()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_none()
    }

    fn guard(&self) -> MutexGuard<'_, Option<PreviewFrame>> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn preview_settings() -> ExportSettings {
        ExportSettings {
            width: 320,
            height: 180,
            fps: 30,
            padding: 8.0,
            corner_radius: 4.0,
            shadow_radius: 4.0,
            ..ExportSettings::default()
        }
    }

    fn solid_frame(timestamp: f64) -> SourceFrame {
        SourceFrame::new(timestamp, RgbaImage::from_pixel(64, 36, Rgba([80, 90, 100, 255])))
    }

    #[test]
    fn test_stride_renders_every_nth_frame() {
        let source = SourceSize::new(64.0, 36.0);
        let mut preview = PreviewRenderer::new(&preview_settings(), 0.5, source, &[])
            .unwrap()
            .with_stride(3);

        let mut rendered = Vec::new();
        for i in 0..7 {
            let out = preview.offer(&solid_frame(i as f64 / 30.0)).unwrap();
            if out.is_some() {
                rendered.push(i);
            }
        }
        assert_eq!(rendered, vec![0, 3, 6]);
    }

    #[test]
    fn test_preview_canvas_uses_scaled_dimensions() {
        let source = SourceSize::new(64.0, 36.0);
        let mut preview = PreviewRenderer::new(&preview_settings(), 0.5, source, &[]).unwrap();

        let out = preview.offer(&solid_frame(0.0)).unwrap().unwrap();
        assert_eq!((out.width(), out.height()), (160, 90));
    }

    #[test]
    fn test_slot_refuses_stale_frames() {
        let slot = PreviewSlot::new();

        assert!(slot.publish(PreviewFrame {
            timestamp: 1.0,
            pixels: RgbaImage::new(2, 2),
        }));
        assert!(!slot.publish(PreviewFrame {
            timestamp: 0.5,
            pixels: RgbaImage::new(2, 2),
        }));

        let held = slot.take().unwrap();
        assert_eq!(held.timestamp, 1.0);
        assert!(slot.take().is_none());
        assert!(slot.is_empty());
    }

    #[test]
    fn test_slot_accepts_equal_and_newer_timestamps() {
        let slot = PreviewSlot::new();
        assert!(slot.publish(PreviewFrame {
            timestamp: 2.0,
            pixels: RgbaImage::new(1, 1),
        }));
        assert!(slot.publish(PreviewFrame {
            timestamp: 2.0,
            pixels: RgbaImage::new(1, 1),
        }));
        assert!(slot.publish(PreviewFrame {
            timestamp: 3.0,
            pixels: RgbaImage::new(1, 1),
        }));
        assert_eq!(slot.take().unwrap().timestamp, 3.0);
    }
}
