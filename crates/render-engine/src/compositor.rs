//! Frame compositor: one source buffer in, one styled canvas out.
//!
//! The layer order is fixed: gradient backdrop, drop shadow, then the
//! cropped and scaled content card with rounded corners. Every call is
//! self-contained and deterministic; identical inputs produce identical
//! bytes.

use camglide_common::CamglideResult;
use camglide_session_model::Rect;
use image::{Rgba, RgbaImage};

use crate::assets::try_rgba_buffer;
use crate::session::RenderSession;

/// Vertical shadow displacement in output pixels.
const SHADOW_OFFSET_Y: i64 = 4;

/// A decoded source frame with its presentation timestamp.
#[derive(Debug, Clone)]
pub struct SourceFrame {
    /// Presentation time in seconds since session start.
    pub timestamp: f64,

    /// Decoded pixels at the source's natural size.
    pub pixels: RgbaImage,
}

impl SourceFrame {
    pub fn new(timestamp: f64, pixels: RgbaImage) -> Self {
        Self { timestamp, pixels }
    }
}

/// Composite one output frame.
///
/// The returned canvas is always exactly the configured output size.
/// Buffer allocation failure is fatal for the frame; bad viewports and
/// empty sources degrade to the full frame or a flat card instead of
/// failing, so one garbled input never aborts a whole export.
pub fn compose_frame(session: &RenderSession, frame: &SourceFrame) -> CamglideResult<RgbaImage> {
    let geometry = session.geometry();
    let assets = session.assets();

    let mut canvas = try_rgba_buffer(geometry.output_width, geometry.output_height)?;
    canvas.copy_from_slice(assets.background.as_raw());

    let viewport = sanitize_viewport(
        session.viewport_at(frame.timestamp),
        session.source_size().bounds(),
    );

    let mut card = if frame.pixels.width() == 0 || frame.pixels.height() == 0 {
        flat_card(
            geometry.card_width,
            geometry.card_height,
            session.settings().background.colors().0,
        )?
    } else {
        resample_viewport(
            &frame.pixels,
            viewport,
            geometry.card_width,
            geometry.card_height,
        )?
    };
    apply_card_mask(&mut card, &assets.card_mask);

    let shadow_x = geometry.card_x - assets.shadow_margin as i64;
    let shadow_y = geometry.card_y - assets.shadow_margin as i64 + SHADOW_OFFSET_Y;
    image::imageops::overlay(&mut canvas, &assets.shadow, shadow_x, shadow_y);
    image::imageops::overlay(&mut canvas, &card, geometry.card_x, geometry.card_y);

    Ok(canvas)
}

/// Replace a degenerate viewport with the full source rect.
fn sanitize_viewport(viewport: Rect, full: Rect) -> Rect {
    let finite = viewport.x.is_finite()
        && viewport.y.is_finite()
        && viewport.w.is_finite()
        && viewport.h.is_finite();
    if finite && viewport.w > 0.0 && viewport.h > 0.0 {
        viewport
    } else {
        tracing::warn!(?viewport, "Degenerate viewport, rendering full frame");
        full
    }
}

/// Crop and scale in one pass with bilinear sampling.
///
/// The viewport origin is fractional: the low-pass camera glides in
/// subpixel steps, and snapping to whole source pixels would turn the
/// glide into visible stepping.
fn resample_viewport(
    source: &RgbaImage,
    viewport: Rect,
    out_w: u32,
    out_h: u32,
) -> CamglideResult<RgbaImage> {
    let mut card = try_rgba_buffer(out_w, out_h)?;

    let step_x = viewport.w / out_w as f64;
    let step_y = viewport.h / out_h as f64;

    for (x, y, pixel) in card.enumerate_pixels_mut() {
        let sx = viewport.x + (x as f64 + 0.5) * step_x - 0.5;
        let sy = viewport.y + (y as f64 + 0.5) * step_y - 0.5;
        *pixel = sample_bilinear(source, sx, sy);
    }

    Ok(card)
}

fn sample_bilinear(source: &RgbaImage, sx: f64, sy: f64) -> Rgba<u8> {
    let max_x = source.width() - 1;
    let max_y = source.height() - 1;

    let sx = sx.clamp(0.0, max_x as f64);
    let sy = sy.clamp(0.0, max_y as f64);

    let x0 = sx.floor() as u32;
    let y0 = sy.floor() as u32;
    let x1 = (x0 + 1).min(max_x);
    let y1 = (y0 + 1).min(max_y);
    let fx = sx - x0 as f64;
    let fy = sy - y0 as f64;

    let p00 = source.get_pixel(x0, y0).0;
    let p10 = source.get_pixel(x1, y0).0;
    let p01 = source.get_pixel(x0, y1).0;
    let p11 = source.get_pixel(x1, y1).0;

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = p00[c] as f64 * (1.0 - fx) + p10[c] as f64 * fx;
        let bottom = p01[c] as f64 * (1.0 - fx) + p11[c] as f64 * fx;
        out[c] = (top * (1.0 - fy) + bottom * fy).round() as u8;
    }
    Rgba(out)
}

/// Stencil the rounded mask into the card's alpha channel. Color is left
/// untouched; the mask only decides what the card covers.
fn apply_card_mask(card: &mut RgbaImage, mask: &image::GrayImage) {
    for (x, y, pixel) in card.enumerate_pixels_mut() {
        pixel.0[3] = mask.get_pixel(x, y).0[0];
    }
}

fn flat_card(width: u32, height: u32, color: [u8; 4]) -> CamglideResult<RgbaImage> {
    let mut card = try_rgba_buffer(width, height)?;
    for pixel in card.pixels_mut() {
        *pixel = Rgba(color);
    }
    Ok(card)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_test_source() -> RgbaImage {
        let mut img = RgbaImage::new(4, 4);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgba([(x * 60) as u8, (y * 60) as u8, 0, 255]);
        }
        img
    }

    #[test]
    fn test_full_viewport_identity_resample() {
        let source = gradient_test_source();
        let card = resample_viewport(&source, Rect::new(0.0, 0.0, 4.0, 4.0), 4, 4).unwrap();
        assert_eq!(card.as_raw(), source.as_raw());
    }

    #[test]
    fn test_bilinear_midpoint_averages_neighbors() {
        let mut source = RgbaImage::new(2, 1);
        source.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        source.put_pixel(1, 0, Rgba([255, 0, 0, 255]));

        let sampled = sample_bilinear(&source, 0.5, 0.0);
        assert_eq!(sampled.0[0], 128);
        assert_eq!(sampled.0[3], 255);
    }

    #[test]
    fn test_sampling_clamps_at_source_edges() {
        let source = gradient_test_source();
        let inside = sample_bilinear(&source, 3.0, 3.0);
        assert_eq!(sample_bilinear(&source, 10.0, 10.0), inside);
        assert_eq!(sample_bilinear(&source, -5.0, -5.0), *source.get_pixel(0, 0));
    }

    #[test]
    fn test_mask_replaces_alpha_only() {
        let mut card = RgbaImage::from_pixel(2, 2, Rgba([9, 8, 7, 255]));
        let mut mask = image::GrayImage::new(2, 2);
        mask.put_pixel(0, 0, image::Luma([0]));
        mask.put_pixel(1, 1, image::Luma([200]));

        apply_card_mask(&mut card, &mask);
        assert_eq!(card.get_pixel(0, 0).0, [9, 8, 7, 0]);
        assert_eq!(card.get_pixel(1, 1).0, [9, 8, 7, 200]);
    }

    #[test]
    fn test_degenerate_viewport_falls_back_to_full() {
        let full = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(sanitize_viewport(Rect::new(0.0, 0.0, 0.0, 10.0), full), full);
        assert_eq!(
            sanitize_viewport(Rect::new(f64::NAN, 0.0, 10.0, 10.0), full),
            full
        );
        let good = Rect::new(5.0, 5.0, 20.0, 10.0);
        assert_eq!(sanitize_viewport(good, full), good);
    }
}
