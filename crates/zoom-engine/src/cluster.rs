//! Click clustering: grouping clicks into zoom episodes.
//!
//! A run of clicks whose gaps stay under [`CLUSTER_GAP_SECS`] forms one
//! cluster. Each cluster spans four phases on the timeline:
//!
//! ```text
//!   zoom_in_start      peak_start            hold_end      zoom_out_end
//!        |--- ramp in ----|---- hold at max ----|--- decay ----|
//!     (first - 0.15)  (first + 0.3)        (last + 1.2)   (+ 0.5)
//! ```
//!
//! Outside every window the target zoom is exactly 1.0.

use camglide_session_model::{CursorSample, Point2D};

use crate::easing::{ease_in_cubic, ease_out_cubic};

/// Seconds of click silence that starts a new cluster.
pub const CLUSTER_GAP_SECS: f64 = 2.0;

/// The camera starts ramping this long before a cluster's first click.
pub const PRE_ROLL_SECS: f64 = 0.15;

/// Zoom-in ramp duration, measured from the first click.
pub const ZOOM_IN_SECS: f64 = 0.3;

/// Hold duration past the last click.
pub const HOLD_SECS: f64 = 1.2;

/// Zoom-out decay duration after the hold ends.
pub const ZOOM_OUT_SECS: f64 = 0.5;

/// One zoom episode with its phase boundaries.
#[derive(Debug, Clone)]
pub struct ClickCluster {
    /// Click samples in this cluster, chronological.
    clicks: Vec<CursorSample>,

    /// Window start: `first_click - PRE_ROLL_SECS`, clamped to 0.
    pub zoom_in_start: f64,

    /// Ramp end: `first_click + ZOOM_IN_SECS`.
    pub peak_start: f64,

    /// Hold end: `last_click + HOLD_SECS`.
    pub hold_end: f64,

    /// Window end: `hold_end + ZOOM_OUT_SECS`, possibly clamped so the
    /// window never reaches into the next cluster's.
    pub zoom_out_end: f64,
}

impl ClickCluster {
    fn from_clicks(clicks: Vec<CursorSample>) -> Self {
        let first = clicks.first().map(|c| c.timestamp).unwrap_or(0.0);
        let last = clicks.last().map(|c| c.timestamp).unwrap_or(first);

        let hold_end = last + HOLD_SECS;
        Self {
            clicks,
            zoom_in_start: (first - PRE_ROLL_SECS).max(0.0),
            peak_start: first + ZOOM_IN_SECS,
            hold_end,
            zoom_out_end: hold_end + ZOOM_OUT_SECS,
        }
    }

    /// Timestamp of the first click.
    pub fn first_time(&self) -> f64 {
        self.clicks.first().map(|c| c.timestamp).unwrap_or(0.0)
    }

    /// Timestamp of the last click.
    pub fn last_time(&self) -> f64 {
        self.clicks.last().map(|c| c.timestamp).unwrap_or(0.0)
    }

    /// Number of clicks in this episode.
    pub fn click_count(&self) -> usize {
        self.clicks.len()
    }

    /// Whether `t` falls inside this cluster's active window.
    pub fn window_contains(&self, t: f64) -> bool {
        t >= self.zoom_in_start && t <= self.zoom_out_end
    }

    /// Target zoom factor at `t`, in `[1.0, max_zoom]`.
    ///
    /// Piecewise over the phases: ease-out-cubic ramp up, pinned hold,
    /// ease-in-cubic decay. Returns 1.0 outside the window. Total for any
    /// input, including degenerate zero-length phases.
    pub fn zoom_at(&self, t: f64, max_zoom: f64) -> f64 {
        if !self.window_contains(t) {
            return 1.0;
        }
        if t < self.peak_start {
            let span = self.peak_start - self.zoom_in_start;
            if span <= 0.0 {
                return max_zoom;
            }
            let p = (t - self.zoom_in_start) / span;
            1.0 + (max_zoom - 1.0) * ease_out_cubic(p)
        } else if t <= self.hold_end {
            max_zoom
        } else {
            let span = self.zoom_out_end - self.hold_end;
            if span <= 0.0 {
                return 1.0;
            }
            let p = (t - self.hold_end) / span;
            1.0 + (max_zoom - 1.0) * (1.0 - ease_in_cubic(p))
        }
    }

    /// Pan target at `t`: the most recent click at or before `t`. During the
    /// pre-roll, before any click has landed, the camera anticipates the
    /// first click.
    pub fn pan_target_at(&self, t: f64) -> Point2D {
        let mut latest = None;
        for click in &self.clicks {
            if click.timestamp <= t {
                latest = Some(click);
            } else {
                break;
            }
        }
        match latest.or_else(|| self.clicks.first()) {
            Some(click) => Point2D::new(click.x, click.y),
            None => Point2D::new(0.0, 0.0),
        }
    }
}

/// Partition the click subsequence of `samples` into clusters.
///
/// A new cluster starts whenever the gap since the previous click reaches
/// [`CLUSTER_GAP_SECS`]. Neighboring windows are then clamped: a cluster's
/// `zoom_out_end` never reaches past the next cluster's `zoom_in_start`, so
/// at most one cluster is active at any instant even if the phase constants
/// are ever retuned.
pub fn build_clusters(samples: &[CursorSample]) -> Vec<ClickCluster> {
    let mut clusters: Vec<ClickCluster> = Vec::new();
    let mut current: Vec<CursorSample> = Vec::new();

    for sample in samples.iter().filter(|s| s.is_click()) {
        if let Some(prev) = current.last() {
            if sample.timestamp - prev.timestamp >= CLUSTER_GAP_SECS {
                clusters.push(ClickCluster::from_clicks(std::mem::take(&mut current)));
            }
        }
        current.push(*sample);
    }
    if !current.is_empty() {
        clusters.push(ClickCluster::from_clicks(current));
    }

    for i in 1..clusters.len() {
        let next_start = clusters[i].zoom_in_start;
        let prev = &mut clusters[i - 1];
        if prev.zoom_out_end > next_start {
            prev.zoom_out_end = next_start.max(prev.hold_end);
        }
    }

    clusters
}

/// The cluster whose window contains `t`, if any. Windows are disjoint, so
/// the first match in time order is the only match.
pub fn active_cluster(clusters: &[ClickCluster], t: f64) -> Option<&ClickCluster> {
    clusters.iter().find(|c| c.window_contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clicks_at(times: &[f64]) -> Vec<CursorSample> {
        times
            .iter()
            .map(|&t| CursorSample::left_click(t, 100.0, 100.0))
            .collect()
    }

    #[test]
    fn test_no_clicks_no_clusters() {
        let samples = vec![CursorSample::move_to(0.0, 1.0, 1.0)];
        assert!(build_clusters(&samples).is_empty());
    }

    #[test]
    fn test_close_clicks_merge_into_one_cluster() {
        let clusters = build_clusters(&clicks_at(&[1.0, 1.5, 2.8]));
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].click_count(), 3);
        assert!((clusters[0].first_time() - 1.0).abs() < 1e-9);
        assert!((clusters[0].last_time() - 2.8).abs() < 1e-9);
    }

    #[test]
    fn test_distant_clicks_split_clusters() {
        let clusters = build_clusters(&clicks_at(&[1.0, 4.0]));
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn test_gap_exactly_at_threshold_splits() {
        let clusters = build_clusters(&clicks_at(&[1.0, 3.0]));
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn test_phase_boundaries() {
        let clusters = build_clusters(&clicks_at(&[1.0, 1.5]));
        let c = &clusters[0];
        assert!((c.zoom_in_start - 0.85).abs() < 1e-9);
        assert!((c.peak_start - 1.3).abs() < 1e-9);
        assert!((c.hold_end - 2.7).abs() < 1e-9);
        assert!((c.zoom_out_end - 3.2).abs() < 1e-9);
    }

    #[test]
    fn test_pre_roll_clamps_at_session_start() {
        let clusters = build_clusters(&clicks_at(&[0.05]));
        assert_eq!(clusters[0].zoom_in_start, 0.0);
    }

    #[test]
    fn test_zoom_profile_through_phases() {
        let clusters = build_clusters(&clicks_at(&[1.0, 1.5]));
        let c = &clusters[0];
        let max = 2.0;

        // Ramp starts at 1.0 and rises.
        assert!((c.zoom_at(0.85, max) - 1.0).abs() < 1e-9);
        let mid_ramp = c.zoom_at(1.1, max);
        assert!(mid_ramp > 1.0 && mid_ramp < max);

        // Hold phase is pinned exactly at max.
        assert_eq!(c.zoom_at(1.3, max), max);
        assert_eq!(c.zoom_at(2.0, max), max);
        assert_eq!(c.zoom_at(2.7, max), max);

        // Decay returns to 1.0 at window end.
        let mid_decay = c.zoom_at(3.0, max);
        assert!(mid_decay > 1.0 && mid_decay < max);
        assert!((c.zoom_at(3.2, max) - 1.0).abs() < 1e-9);

        // Outside the window: exactly 1.0.
        assert_eq!(c.zoom_at(0.5, max), 1.0);
        assert_eq!(c.zoom_at(4.0, max), 1.0);
    }

    #[test]
    fn test_ramp_matches_ease_out_cubic() {
        let clusters = build_clusters(&clicks_at(&[1.0]));
        let c = &clusters[0];
        // Halfway through the 0.45s ramp: p = 0.5, ease-out = 0.875.
        let t = c.zoom_in_start + (c.peak_start - c.zoom_in_start) * 0.5;
        assert!((c.zoom_at(t, 3.0) - (1.0 + 2.0 * 0.875)).abs() < 1e-9);
    }

    #[test]
    fn test_pan_target_tracks_latest_click() {
        let samples = vec![
            CursorSample::left_click(1.0, 100.0, 100.0),
            CursorSample::left_click(1.5, 500.0, 400.0),
        ];
        let clusters = build_clusters(&samples);
        let c = &clusters[0];

        // Pre-roll anticipates the first click.
        let target = c.pan_target_at(0.9);
        assert_eq!((target.x, target.y), (100.0, 100.0));

        // Between clicks the first is still the latest.
        let target = c.pan_target_at(1.2);
        assert_eq!((target.x, target.y), (100.0, 100.0));

        // After the second click the target moves.
        let target = c.pan_target_at(2.0);
        assert_eq!((target.x, target.y), (500.0, 400.0));
    }

    #[test]
    fn test_windows_never_overlap() {
        // Minimum legal gap between clusters.
        let clusters = build_clusters(&clicks_at(&[1.0, 3.1]));
        assert_eq!(clusters.len(), 2);
        assert!(clusters[0].zoom_out_end <= clusters[1].zoom_in_start + 1e-9);

        for t in [0.0, 1.0, 2.0, 2.9, 2.96, 3.5, 5.0] {
            let active = clusters.iter().filter(|c| c.window_contains(t)).count();
            assert!(active <= 1, "overlap at t={t}");
        }
    }

    #[test]
    fn test_active_cluster_lookup() {
        let clusters = build_clusters(&clicks_at(&[1.0, 6.0]));
        assert!(active_cluster(&clusters, 1.2).is_some());
        assert!(active_cluster(&clusters, 4.5).is_none());
        let second = active_cluster(&clusters, 6.5).unwrap();
        assert!((second.first_time() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_right_clicks_participate() {
        let samples = vec![
            CursorSample::right_click(1.0, 10.0, 10.0),
            CursorSample::left_click(1.4, 20.0, 20.0),
        ];
        let clusters = build_clusters(&samples);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].click_count(), 2);
    }
}
