//! Per-session render context.
//!
//! One `RenderSession` is built per export or preview run. It owns the
//! validated settings, the zoom trajectory, the layout geometry, and the
//! cached composite assets, and is shared read-only by every frame call.

use camglide_common::CamglideResult;
use camglide_session_model::{CursorSample, ExportSettings, Rect, SourceSize, ZoomKeyframe};
use camglide_zoom_engine::{interpolated_rect, ZoomAnalyzer};

use crate::assets::CompositeAssets;

/// Fixed layout for one session: where the content card sits on the canvas.
///
/// The card preserves the source aspect ratio, fitted inside the padded
/// content box and centered on the canvas. Zoom keyframes preserve the
/// source aspect too, so the card size is constant for the whole session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGeometry {
    /// Canvas width in pixels.
    pub output_width: u32,
    /// Canvas height in pixels.
    pub output_height: u32,
    /// Content card width in pixels.
    pub card_width: u32,
    /// Content card height in pixels.
    pub card_height: u32,
    /// Card origin on the canvas.
    pub card_x: i64,
    /// Card origin on the canvas.
    pub card_y: i64,
}

impl FrameGeometry {
    pub fn new(settings: &ExportSettings, source: SourceSize) -> Self {
        let content_w = settings.content_width();
        let content_h = settings.content_height();

        let aspect = source.aspect();
        let (card_w, card_h) = if aspect.is_finite() && aspect > 0.0 {
            let mut w = content_w;
            let mut h = content_w / aspect;
            if h > content_h {
                h = content_h;
                w = content_h * aspect;
            }
            (w, h)
        } else {
            // Degenerate source, fall back to the whole content box.
            (content_w, content_h)
        };

        let card_width = (card_w.round() as u32).clamp(1, settings.width);
        let card_height = (card_h.round() as u32).clamp(1, settings.height);

        Self {
            output_width: settings.width,
            output_height: settings.height,
            card_width,
            card_height,
            card_x: (settings.width as i64 - card_width as i64) / 2,
            card_y: (settings.height as i64 - card_height as i64) / 2,
        }
    }
}

/// Context object threaded through every frame call of a session.
#[derive(Debug)]
pub struct RenderSession {
    settings: ExportSettings,
    source: SourceSize,
    geometry: FrameGeometry,
    assets: CompositeAssets,
    keyframes: Vec<ZoomKeyframe>,
}

impl RenderSession {
    /// Build a session from validated settings, the source frame size, and
    /// a snapshot of the cursor log.
    ///
    /// Settings are rejected and assets allocated before any frame work, so
    /// configuration and buffer errors surface up front.
    pub fn new(
        settings: ExportSettings,
        source: SourceSize,
        samples: &[CursorSample],
    ) -> CamglideResult<Self> {
        settings.validate()?;

        let keyframes = if settings.enable_zoom {
            ZoomAnalyzer::with_max_zoom(settings.max_zoom).compute_keyframes(samples, source)
        } else {
            vec![ZoomKeyframe::new(0.0, source.bounds())]
        };

        let geometry = FrameGeometry::new(&settings, source);
        let assets = CompositeAssets::build(&settings, &geometry)?;

        tracing::info!(
            canvas_w = geometry.output_width,
            canvas_h = geometry.output_height,
            card_w = geometry.card_width,
            card_h = geometry.card_height,
            keyframes = keyframes.len(),
            zoom = settings.enable_zoom,
            "Render session ready"
        );

        Ok(Self {
            settings,
            source,
            geometry,
            assets,
            keyframes,
        })
    }

    /// The viewport to crop from the source at time `t`.
    pub fn viewport_at(&self, t: f64) -> Rect {
        interpolated_rect(&self.keyframes, t, self.source)
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    pub fn source_size(&self) -> SourceSize {
        self.source
    }

    pub fn geometry(&self) -> &FrameGeometry {
        &self.geometry
    }

    pub fn assets(&self) -> &CompositeAssets {
        &self.assets
    }

    pub fn keyframes(&self) -> &[ZoomKeyframe] {
        &self.keyframes
    }
}
