//! Session-cached composite assets.
//!
//! The gradient backdrop, the rounded card mask, and the blurred drop
//! shadow depend only on `ExportSettings` and the session geometry, so
//! they are rendered once per session and reused for every frame.

use camglide_common::{CamglideError, CamglideResult};
use camglide_session_model::ExportSettings;
use image::{GrayImage, Rgba, RgbaImage};

use crate::session::FrameGeometry;

/// Shadow silhouette opacity before blurring.
const SHADOW_ALPHA: f64 = 0.4;

/// Pre-rendered images shared by every composite call in a session.
#[derive(Debug, Clone)]
pub struct CompositeAssets {
    /// Full-canvas gradient backdrop.
    pub background: RgbaImage,

    /// Alpha stencil for the content card, sized to the card.
    pub card_mask: GrayImage,

    /// Blurred shadow sprite, padded by `shadow_margin` on every side so
    /// the blur is not clipped at the card edge.
    pub shadow: RgbaImage,

    /// Padding around the shadow sprite in pixels.
    pub shadow_margin: u32,
}

impl CompositeAssets {
    /// Render all session assets.
    ///
    /// Buffer allocation is the only failure mode; it surfaces as
    /// `CamglideError::BufferCreation` before any frame is processed.
    pub fn build(settings: &ExportSettings, geometry: &FrameGeometry) -> CamglideResult<Self> {
        let background = render_gradient(
            geometry.output_width,
            geometry.output_height,
            settings.background.colors(),
        )?;

        let card_mask = render_rounded_mask(
            geometry.card_width,
            geometry.card_height,
            settings.corner_radius,
        )?;

        let (shadow, shadow_margin) =
            render_shadow_sprite(&card_mask, settings.shadow_radius)?;

        tracing::debug!(
            canvas_w = geometry.output_width,
            canvas_h = geometry.output_height,
            card_w = geometry.card_width,
            card_h = geometry.card_height,
            shadow_margin,
            "Composite assets built"
        );

        Ok(Self {
            background,
            card_mask,
            shadow,
            shadow_margin,
        })
    }
}

/// Allocate an RGBA buffer without aborting on out-of-memory.
pub(crate) fn try_rgba_buffer(width: u32, height: u32) -> CamglideResult<RgbaImage> {
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(4))
        .ok_or_else(|| CamglideError::buffer_creation(width, height))?;

    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| CamglideError::buffer_creation(width, height))?;
    data.resize(len, 0);

    RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| CamglideError::buffer_creation(width, height))
}

fn try_gray_buffer(width: u32, height: u32) -> CamglideResult<GrayImage> {
    let len = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| CamglideError::buffer_creation(width, height))?;

    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| CamglideError::buffer_creation(width, height))?;
    data.resize(len, 0);

    GrayImage::from_raw(width, height, data)
        .ok_or_else(|| CamglideError::buffer_creation(width, height))
}

/// Diagonal linear gradient, bottom-left start to top-right end.
fn render_gradient(
    width: u32,
    height: u32,
    (start, end): ([u8; 4], [u8; 4]),
) -> CamglideResult<RgbaImage> {
    let mut img = try_rgba_buffer(width, height)?;

    let max_x = (width.saturating_sub(1)).max(1) as f64;
    let max_y = (height.saturating_sub(1)).max(1) as f64;

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let fx = x as f64 / max_x;
        let fy = 1.0 - (y as f64 / max_y);
        let t = (fx + fy) / 2.0;
        *pixel = Rgba([
            mix_channel(start[0], end[0], t),
            mix_channel(start[1], end[1], t),
            mix_channel(start[2], end[2], t),
            mix_channel(start[3], end[3], t),
        ]);
    }

    Ok(img)
}

/// White rounded rectangle on black, with a one-pixel soft edge.
fn render_rounded_mask(width: u32, height: u32, corner_radius: f64) -> CamglideResult<GrayImage> {
    let mut mask = try_gray_buffer(width, height)?;

    let half_w = width as f64 / 2.0;
    let half_h = height as f64 / 2.0;
    let radius = corner_radius.clamp(0.0, half_w.min(half_h));

    for (x, y, pixel) in mask.enumerate_pixels_mut() {
        let px = (x as f64 + 0.5 - half_w).abs() - (half_w - radius);
        let py = (y as f64 + 0.5 - half_h).abs() - (half_h - radius);

        // Signed distance to the rounded-rect boundary.
        let qx = px.max(0.0);
        let qy = py.max(0.0);
        let dist = (qx * qx + qy * qy).sqrt() + px.max(py).min(0.0) - radius;

        let coverage = (0.5 - dist).clamp(0.0, 1.0);
        pixel.0[0] = (coverage * 255.0).round() as u8;
    }

    Ok(mask)
}

/// Black silhouette of the card at `SHADOW_ALPHA`, Gaussian-blurred with
/// sigma `shadow_radius`. The sprite is padded so the blur tail survives.
fn render_shadow_sprite(
    card_mask: &GrayImage,
    shadow_radius: f64,
) -> CamglideResult<(RgbaImage, u32)> {
    let sigma = shadow_radius.max(0.0);
    let margin = (sigma * 3.0).ceil() as u32 + 2;

    let sprite_w = card_mask.width().saturating_add(margin * 2);
    let sprite_h = card_mask.height().saturating_add(margin * 2);
    let mut sprite = try_rgba_buffer(sprite_w, sprite_h)?;

    for (x, y, pixel) in card_mask.enumerate_pixels() {
        let alpha = (pixel.0[0] as f64 * SHADOW_ALPHA).round() as u8;
        sprite.put_pixel(x + margin, y + margin, Rgba([0, 0, 0, alpha]));
    }

    let blurred = if sigma > 0.0 {
        image::imageops::blur(&sprite, sigma as f32)
    } else {
        sprite
    };

    Ok((blurred, margin))
}

fn mix_channel(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round() as u8
}
