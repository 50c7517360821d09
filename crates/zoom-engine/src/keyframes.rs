//! Keyframe computation: cursor log in, virtual-camera trajectory out.
//!
//! # Algorithm
//!
//! 1. **Cluster** clicks into zoom episodes (see [`crate::cluster`]).
//! 2. For every move sample, look up the active cluster (if any) and derive
//!    the target zoom from its eased phases.
//! 3. **Pan target**: the latest click of the active cluster while zoomed,
//!    the raw cursor while unzoomed.
//! 4. **Low-pass filter** the camera center toward the target — fast while
//!    zoomed, lazy while unzoomed — so the camera glides instead of snapping.
//! 5. Emit one viewport keyframe per move sample, clamped to source bounds.

use camglide_session_model::{CursorSample, Point2D, SourceSize, ZoomKeyframe};

use crate::cluster::{active_cluster, build_clusters};

/// Configuration for the zoom analyzer.
#[derive(Debug, Clone)]
pub struct ZoomConfig {
    /// Zoom factor at a cluster's peak. 1.0 disables zooming entirely.
    pub max_zoom: f64,

    /// Per-sample low-pass coefficient while a cluster is active. Higher
    /// values track clicks more eagerly.
    pub follow_zoomed: f64,

    /// Per-sample low-pass coefficient while no cluster is active.
    pub follow_relaxed: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            max_zoom: 2.0,
            follow_zoomed: 0.15,
            follow_relaxed: 0.05,
        }
    }
}

/// The zoom analyzer. Stateless between calls; safe to share.
pub struct ZoomAnalyzer {
    config: ZoomConfig,
}

impl ZoomAnalyzer {
    /// Create a new analyzer with the given configuration.
    pub fn new(config: ZoomConfig) -> Self {
        Self { config }
    }

    /// Create an analyzer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ZoomConfig::default())
    }

    /// Create an analyzer with default follow coefficients and the given
    /// peak zoom.
    pub fn with_max_zoom(max_zoom: f64) -> Self {
        Self::new(ZoomConfig {
            max_zoom,
            ..ZoomConfig::default()
        })
    }

    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    /// Compute the camera trajectory for a session.
    ///
    /// Returns one keyframe per move sample, timestamps preserved. Fewer
    /// than two move samples produce a single identity keyframe at `t = 0`
    /// covering the whole source — a degenerate log never fails, it just
    /// doesn't zoom. The input must already be chronological; it is not
    /// re-sorted, and out-of-order input yields a plausible but unspecified
    /// trajectory rather than an error.
    pub fn compute_keyframes(
        &self,
        samples: &[CursorSample],
        source: SourceSize,
    ) -> Vec<ZoomKeyframe> {
        let moves: Vec<&CursorSample> = samples.iter().filter(|s| s.is_move()).collect();
        if moves.len() < 2 {
            return vec![ZoomKeyframe::new(0.0, source.bounds())];
        }

        let clusters = build_clusters(samples);
        tracing::debug!(
            moves = moves.len(),
            clusters = clusters.len(),
            "computing zoom keyframes"
        );

        // Start the filter on the first sample so the camera does not swoop
        // in from the origin.
        let mut camera = Point2D::new(moves[0].x, moves[0].y);
        let mut keyframes = Vec::with_capacity(moves.len());

        for sample in moves {
            let t = sample.timestamp;
            let (zoom, target, alpha) = match active_cluster(&clusters, t) {
                Some(cluster) => (
                    cluster.zoom_at(t, self.config.max_zoom),
                    cluster.pan_target_at(t),
                    self.config.follow_zoomed,
                ),
                None => (
                    1.0,
                    Point2D::new(sample.x, sample.y),
                    self.config.follow_relaxed,
                ),
            };

            camera.x += (target.x - camera.x) * alpha;
            camera.y += (target.y - camera.y) * alpha;

            let viewport = camglide_session_model::Rect::centered_within(
                camera.x,
                camera.y,
                source.width / zoom,
                source.height / zoom,
                source,
            );
            keyframes.push(ZoomKeyframe::new(t, viewport));
        }

        keyframes
    }
}
