//! Render a cursor session over a synthetic source to a PNG sequence.
//!
//! The source is a generated desktop-like test pattern with the recorded
//! cursor drawn onto every frame, so camera motion can be inspected without
//! any capture pipeline attached.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use camglide_common::{CamglideError, CamglideResult};
use camglide_render_engine::{
    export_session, FrameSink, FrameSource, ProgressCallback, RenderSession, SourceFrame,
};
use camglide_session_model::{
    parse_header, parse_samples, CursorSample, ExportSettings, GradientPreset, SourceSize,
};
use image::{ImageBuffer, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;

/// Source that replays the cursor log over a generated test pattern.
struct SyntheticSource {
    base: RgbaImage,
    samples: Vec<CursorSample>,
    size: SourceSize,
    fps: u32,
    total: u64,
    emitted: u64,
}

impl SyntheticSource {
    fn new(size: SourceSize, samples: Vec<CursorSample>, fps: u32, duration: f64) -> Self {
        let width = size.width.round().max(1.0) as u32;
        let height = size.height.round().max(1.0) as u32;
        Self {
            base: desktop_pattern(width, height),
            samples,
            size,
            fps,
            total: (duration * fps as f64).ceil().max(1.0) as u64,
            emitted: 0,
        }
    }
}

impl FrameSource for SyntheticSource {
    fn source_size(&self) -> SourceSize {
        self.size
    }

    fn frame_count_hint(&self) -> Option<u64> {
        Some(self.total)
    }

    fn next_frame(&mut self) -> CamglideResult<Option<SourceFrame>> {
        if self.emitted == self.total {
            return Ok(None);
        }
        let timestamp = self.emitted as f64 / self.fps as f64;
        self.emitted += 1;

        let mut pixels = self.base.clone();
        if let Some((x, y)) = cursor_position(&self.samples, timestamp) {
            let center = (x.round() as i32, y.round() as i32);
            draw_filled_circle_mut(&mut pixels, center, 7, Rgba([255, 255, 255, 255]));
            draw_filled_circle_mut(&mut pixels, center, 4, Rgba([30, 30, 40, 255]));
        }
        Ok(Some(SourceFrame::new(timestamp, pixels)))
    }
}

/// Desktop-like test pattern: dark field, 100px grid, brighter center axes
/// and quadrant markers.
fn desktop_pattern(width: u32, height: u32) -> RgbaImage {
    let mut img = ImageBuffer::from_pixel(width, height, Rgba([40, 40, 50, 255]));

    let line = Rgba([80, 80, 90, 255]);
    for x in (0..width).step_by(100) {
        for y in 0..height {
            img.put_pixel(x, y, line);
        }
    }
    for y in (0..height).step_by(100) {
        for x in 0..width {
            img.put_pixel(x, y, line);
        }
    }

    let axis = Rgba([150, 150, 160, 255]);
    let (mid_x, mid_y) = (width / 2, height / 2);
    for y in 0..height {
        img.put_pixel(mid_x, y, axis);
    }
    for x in 0..width {
        img.put_pixel(x, mid_y, axis);
    }

    for (x, y) in [
        (width / 4, height / 4),
        (3 * width / 4, height / 4),
        (3 * width / 4, 3 * height / 4),
        (width / 4, 3 * height / 4),
    ] {
        draw_filled_circle_mut(&mut img, (x as i32, y as i32), 10, Rgba([200, 150, 50, 255]));
    }

    img
}

/// Linearly interpolated cursor position at `t`, or `None` for an empty log.
fn cursor_position(samples: &[CursorSample], t: f64) -> Option<(f64, f64)> {
    if samples.is_empty() {
        return None;
    }
    let after = samples.partition_point(|s| s.timestamp <= t);
    if after == 0 {
        return Some(samples[0].position());
    }
    if after == samples.len() {
        return Some(samples[samples.len() - 1].position());
    }
    let (lo, hi) = (&samples[after - 1], &samples[after]);
    let span = hi.timestamp - lo.timestamp;
    if span <= 0.0 {
        return Some(lo.position());
    }
    let p = (t - lo.timestamp) / span;
    Some((lo.x + (hi.x - lo.x) * p, lo.y + (hi.y - lo.y) * p))
}

/// Sink that writes each frame as `frame-NNNNN.png` under one directory.
struct PngSequenceSink {
    dir: PathBuf,
    written: u64,
}

impl PngSequenceSink {
    fn new(dir: PathBuf) -> CamglideResult<Self> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, written: 0 })
    }
}

impl FrameSink for PngSequenceSink {
    fn write_frame(&mut self, _timestamp: f64, frame: &RgbaImage) -> CamglideResult<()> {
        let path = self.dir.join(format!("frame-{:05}.png", self.written));
        frame.save(&path).map_err(|e| {
            CamglideError::render(format!("Failed to write {}: {e}", path.display()))
        })?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> CamglideResult<()> {
        Ok(())
    }
}

pub async fn run(
    log: PathBuf,
    output: Option<PathBuf>,
    width: u32,
    height: u32,
    fps: u32,
    duration: Option<f64>,
    background: String,
    enable_zoom: bool,
    max_zoom: f64,
) -> anyhow::Result<()> {
    println!("Rendering cursor log: {}", log.display());

    let content = std::fs::read_to_string(&log)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", log.display()))?;
    let samples = parse_samples(&content);

    // Without a header the pattern is drawn at output size, so cursor
    // coordinates are taken to be in output space.
    let source = match parse_header(&content) {
        Some(header) => SourceSize::from_pixels(header.source_width, header.source_height),
        None => SourceSize::from_pixels(width, height),
    };

    let preset = GradientPreset::from_name(&background).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown gradient `{background}`. Use: midnight, ocean, sunset, forest, graphite"
        )
    })?;

    let settings = ExportSettings {
        width,
        height,
        fps,
        background: preset,
        enable_zoom,
        max_zoom,
        ..ExportSettings::default()
    };

    let duration = duration
        .unwrap_or_else(|| samples.last().map(|s| s.timestamp + 1.0).unwrap_or(3.0))
        .max(0.0);
    let output_dir = output.unwrap_or_else(|| {
        camglide_common::config::AppConfig::load()
            .renders_dir
            .join("synthetic")
    });

    println!(
        "  Source: {}x{} (synthetic pattern)",
        source.width, source.height
    );
    println!(
        "  Output: {} ({}x{} @ {}fps, {})",
        output_dir.display(),
        width,
        height,
        fps,
        preset.name()
    );
    println!("  Duration: {duration:.2}s");

    let session = Arc::new(
        RenderSession::new(settings, source, &samples)
            .map_err(|e| anyhow::anyhow!("Failed to build render session: {e}"))?,
    );
    let frames = SyntheticSource::new(source, samples, fps, duration);
    tracing::debug!(
        total_frames = frames.total,
        keyframes = session.keyframes().len(),
        "Synthetic source prepared"
    );
    let sink = PngSequenceSink::new(output_dir.clone())
        .map_err(|e| anyhow::anyhow!("Failed to prepare {}: {e}", output_dir.display()))?;

    let progress_cb: ProgressCallback = Box::new(|p| {
        if let Some(total) = p.total_frames {
            print!(
                "\r  Progress: {:5.1}% ({}/{} frames, ETA {:.0}s)  ",
                p.progress * 100.0,
                p.frames_rendered,
                total,
                p.eta_secs
            );
            let _ = std::io::Write::flush(&mut std::io::stdout());
        }
    });

    let report = export_session(
        session,
        Box::new(frames),
        Box::new(sink),
        Arc::new(AtomicBool::new(false)),
        Some(progress_cb),
    )
    .await
    .map_err(|e| anyhow::anyhow!("Render failed: {e}"))?;

    println!(
        "\nRendered {} frames ({:.2}s of video) in {:.2}s.",
        report.frames_rendered, report.media_duration_secs, report.elapsed_secs
    );
    println!("Frames written to {}", output_dir.display());

    Ok(())
}
