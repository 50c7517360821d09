//! Export driver: the pull loop between decoder and encoder.
//!
//! The driver pulls one source frame at a time, composites it, and hands
//! it to the sink before pulling the next. A slow sink therefore applies
//! backpressure naturally; frames are never dropped or reordered, and the
//! output stream corresponds 1:1 with the source stream.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use camglide_common::{CamglideError, CamglideResult, RateController};
use camglide_session_model::SourceSize;
use image::RgbaImage;
use serde::Serialize;

use crate::compositor::{compose_frame, SourceFrame};
use crate::session::RenderSession;

/// Ceiling on intermediate progress emissions.
const PROGRESS_EMIT_HZ: f64 = 4.0;

/// Supplies decoded source frames in presentation order.
pub trait FrameSource: Send {
    /// Natural pixel size of the decoded frames.
    fn source_size(&self) -> SourceSize;

    /// Expected frame count if the container knows it up front. Used only
    /// for progress fractions; end of stream is still signaled by
    /// `next_frame` returning `None`.
    fn frame_count_hint(&self) -> Option<u64>;

    /// Pull the next frame, blocking until one is ready. `Ok(None)` ends
    /// the stream; errors abort the job and reach the caller verbatim.
    fn next_frame(&mut self) -> CamglideResult<Option<SourceFrame>>;
}

/// Consumes composited frames in order, one call per source frame.
pub trait FrameSink: Send {
    /// Accept one frame. Blocks while the encoder is busy; the driver will
    /// not pull another source frame until this returns.
    fn write_frame(&mut self, timestamp: f64, frame: &RgbaImage) -> CamglideResult<()>;

    /// Flush and finalize the output. Called once, only after the source
    /// stream completed successfully.
    fn finish(&mut self) -> CamglideResult<()>;
}

/// Progress callback for export rendering.
pub type ProgressCallback = Box<dyn Fn(ExportProgress) + Send>;

/// Export progress report.
///
/// `progress` is non-decreasing across one export and reaches exactly 1.0
/// on success.
#[derive(Debug, Clone, Serialize)]
pub struct ExportProgress {
    /// Completed fraction in [0.0, 1.0].
    pub progress: f64,

    /// Frames rendered so far.
    pub frames_rendered: u64,

    /// Total frames, when the source offered a hint.
    pub total_frames: Option<u64>,

    /// Estimated seconds remaining; 0.0 when unknown.
    pub eta_secs: f64,

    /// Current stage.
    pub stage: ExportStage,
}

/// Stages of the export process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportStage {
    Preparing,
    Rendering,
    Complete,
    Cancelled,
    Failed,
}

/// Final accounting for one export run.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub outcome: ExportOutcome,

    /// Frames composited and accepted by the sink.
    pub frames_rendered: u64,

    /// Presentation timestamp of the last rendered frame.
    pub media_duration_secs: f64,

    /// Wall-clock time spent in the pull loop.
    pub elapsed_secs: f64,
}

/// How an export run ended (errors are reported separately).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportOutcome {
    Completed,
    Cancelled,
}

/// Throttled, monotone progress reporting.
struct ProgressEmitter {
    callback: Option<ProgressCallback>,
    rate: RateController,
    started: Instant,
    last_fraction: f64,
}

impl ProgressEmitter {
    fn new(callback: Option<ProgressCallback>) -> Self {
        Self {
            callback,
            rate: RateController::new(PROGRESS_EMIT_HZ),
            started: Instant::now(),
            last_fraction: 0.0,
        }
    }

    fn emit(&mut self, stage: ExportStage, frames: u64, total: Option<u64>, force: bool) {
        let Some(callback) = &self.callback else {
            return;
        };

        let now = self.started.elapsed().as_secs_f64();
        let due = self.rate.should_tick(now);
        if !force && !due {
            return;
        }

        let fraction = match stage {
            ExportStage::Complete => 1.0,
            _ => total
                .filter(|t| *t > 0)
                .map(|t| (frames as f64 / t as f64).min(1.0))
                .unwrap_or(0.0),
        };
        // A low frame-count hint must not make progress regress.
        let fraction = fraction.max(self.last_fraction);
        self.last_fraction = fraction;

        let eta_secs = if stage == ExportStage::Rendering && fraction > 0.0 && fraction < 1.0 {
            now * (1.0 - fraction) / fraction
        } else {
            0.0
        };

        callback(ExportProgress {
            progress: fraction,
            frames_rendered: frames,
            total_frames: total,
            eta_secs,
            stage,
        });
    }

    fn failed(&mut self, frames: u64, total: Option<u64>) {
        self.emit(ExportStage::Failed, frames, total, true);
    }
}

/// Run the export pull loop to completion, cancellation, or failure.
///
/// Cancellation is checked between frames; the frame in flight always
/// completes, and resources are released by dropping the source and sink.
/// Source and sink errors abort the job and are propagated unchanged.
pub fn render_export(
    session: &RenderSession,
    source: &mut dyn FrameSource,
    sink: &mut dyn FrameSink,
    cancel: &AtomicBool,
    progress: Option<ProgressCallback>,
) -> CamglideResult<ExportReport> {
    let started = Instant::now();
    let total_hint = source.frame_count_hint();
    let mut emitter = ProgressEmitter::new(progress);

    tracing::info!(
        out_w = session.geometry().output_width,
        out_h = session.geometry().output_height,
        fps = session.settings().fps,
        total_hint,
        "Starting export render"
    );
    emitter.emit(ExportStage::Preparing, 0, total_hint, true);

    let mut frames: u64 = 0;
    let mut last_timestamp = 0.0f64;

    let outcome = loop {
        if cancel.load(Ordering::Relaxed) {
            tracing::info!(frames, "Export cancelled");
            break ExportOutcome::Cancelled;
        }

        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break ExportOutcome::Completed,
            Err(e) => {
                emitter.failed(frames, total_hint);
                return Err(e);
            }
        };

        let canvas = match compose_frame(session, &frame) {
            Ok(canvas) => canvas,
            Err(e) => {
                emitter.failed(frames, total_hint);
                return Err(e);
            }
        };

        if let Err(e) = sink.write_frame(frame.timestamp, &canvas) {
            emitter.failed(frames, total_hint);
            return Err(e);
        }

        frames += 1;
        last_timestamp = frame.timestamp;
        emitter.emit(ExportStage::Rendering, frames, total_hint, false);
    };

    match outcome {
        ExportOutcome::Completed => {
            if let Err(e) = sink.finish() {
                emitter.failed(frames, total_hint);
                return Err(e);
            }
            emitter.emit(ExportStage::Complete, frames, Some(frames.max(1)), true);
        }
        ExportOutcome::Cancelled => {
            emitter.emit(ExportStage::Cancelled, frames, total_hint, true);
        }
    }

    let report = ExportReport {
        outcome,
        frames_rendered: frames,
        media_duration_secs: last_timestamp,
        elapsed_secs: started.elapsed().as_secs_f64(),
    };
    tracing::info!(
        frames = report.frames_rendered,
        media_duration_secs = report.media_duration_secs,
        elapsed_secs = report.elapsed_secs,
        outcome = ?report.outcome,
        "Export render finished"
    );
    Ok(report)
}

/// Async entry point: runs the pull loop on the blocking pool so the pixel
/// work never stalls the async executor.
pub async fn export_session(
    session: Arc<RenderSession>,
    mut source: Box<dyn FrameSource>,
    mut sink: Box<dyn FrameSink>,
    cancel: Arc<AtomicBool>,
    progress: Option<ProgressCallback>,
) -> CamglideResult<ExportReport> {
    let handle = tokio::task::spawn_blocking(move || {
        render_export(&session, source.as_mut(), sink.as_mut(), &cancel, progress)
    });

    handle
        .await
        .map_err(|e| CamglideError::render(format!("Export worker terminated: {e}")))?
}
