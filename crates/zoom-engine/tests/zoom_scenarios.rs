use std::path::PathBuf;

use camglide_session_model::{parse_samples, CursorSample, SourceSize};
use camglide_zoom_engine::{build_clusters, interpolated_rect, ZoomAnalyzer};

fn load_fixture_samples() -> Vec<CursorSample> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("clicks.jsonl");

    let content = std::fs::read_to_string(path).expect("fixture log should be readable");
    parse_samples(&content)
}

fn fnv1a_64(input: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in input.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

fn trajectory_signature(keyframes: &[camglide_session_model::ZoomKeyframe]) -> u64 {
    let text = keyframes
        .iter()
        .map(|kf| {
            format!(
                "{:.3}|{:.6}|{:.6}|{:.6}|{:.6}",
                kf.time, kf.viewport.x, kf.viewport.y, kf.viewport.w, kf.viewport.h
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    fnv1a_64(&text)
}

/// A 60Hz move trail pinned at one point, with clicks at the given times.
fn pinned_log(at: (f64, f64), duration: f64, clicks: &[f64]) -> Vec<CursorSample> {
    let mut samples = Vec::new();
    let steps = (duration * 60.0) as usize;
    for i in 0..=steps {
        samples.push(CursorSample::move_to(i as f64 / 60.0, at.0, at.1));
    }
    for &t in clicks {
        samples.push(CursorSample::left_click(t, at.0, at.1));
    }
    samples.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    samples
}

/// Two clicks half a second apart on a 4K source: one cluster, ramp from
/// 0.85s, peak at 1.3s, hold until 2.7s, back to full frame by 3.2s.
#[test]
fn double_click_cluster_follows_phase_timeline() {
    let source = SourceSize::new(3840.0, 2160.0);
    let samples = pinned_log((1000.0, 1000.0), 4.0, &[1.0, 1.5]);

    let clusters = build_clusters(&samples);
    assert_eq!(clusters.len(), 1, "0.5s gap must merge into one cluster");

    let analyzer = ZoomAnalyzer::with_defaults();
    let keyframes = analyzer.compute_keyframes(&samples, source);

    let viewport_at = |t: f64| {
        keyframes
            .iter()
            .find(|k| (k.time - t).abs() < 1e-6)
            .unwrap_or_else(|| panic!("no keyframe at t={t}"))
            .viewport
    };

    // Before the pre-roll: full frame.
    assert!((viewport_at(0.8).w - 3840.0).abs() < 1e-6);

    // Mid-ramp: strictly between full frame and peak.
    let ramping = viewport_at(1.0);
    assert!(ramping.w < 3840.0 && ramping.w > 1920.0);

    // Peak through hold end: exactly half the source per axis.
    for t in [1.3, 2.0, 2.7] {
        let held = viewport_at(t);
        assert!((held.w - 1920.0).abs() < 1e-6, "w at t={t} was {}", held.w);
        assert!((held.h - 1080.0).abs() < 1e-6);
    }

    // Decay finished: full frame again.
    assert!((viewport_at(3.2).w - 3840.0).abs() < 1e-6);
    assert!((viewport_at(3.5).w - 3840.0).abs() < 1e-6);

    // The held viewport is centered on the click point — the cursor sat
    // there the whole time, so the filter has fully converged.
    let held = viewport_at(2.0);
    let center = held.center();
    assert!((center.x - 1000.0).abs() < 1.0);
    assert!((center.y - 1000.0).abs() < 1.0);
    assert!(held.within(source));
}

#[test]
fn interpolation_between_samples_stays_bounded_and_smooth() {
    let source = SourceSize::new(3840.0, 2160.0);
    let samples = pinned_log((1000.0, 1000.0), 4.0, &[1.0, 1.5]);
    let keyframes = ZoomAnalyzer::with_defaults().compute_keyframes(&samples, source);

    // Sweep at 240Hz, four times the keyframe rate.
    let mut prev = interpolated_rect(&keyframes, 0.0, source);
    for i in 1..=960 {
        let t = i as f64 / 240.0;
        let rect = interpolated_rect(&keyframes, t, source);
        assert!(rect.within(source), "escaped bounds at t={t}");
        // One keyframe interval never moves the viewport more than the
        // distance between neighboring keyframes.
        assert!((rect.w - prev.w).abs() < 200.0, "width jump at t={t}");
        prev = rect;
    }
}

#[test]
fn empty_log_interpolates_to_full_frame_everywhere() {
    let source = SourceSize::new(1920.0, 1080.0);
    let keyframes = ZoomAnalyzer::with_defaults().compute_keyframes(&[], source);
    assert_eq!(keyframes.len(), 1);
    for t in [0.0, 0.5, 10.0, 1e6] {
        assert_eq!(interpolated_rect(&keyframes, t, source), source.bounds());
    }
}

#[test]
fn fixture_session_produces_expected_episodes() {
    let samples = load_fixture_samples();
    assert!(samples.len() > 100, "fixture should carry a real session");

    let source = SourceSize::new(1920.0, 1080.0);
    let clusters = build_clusters(&samples);
    assert_eq!(clusters.len(), 2, "fixture has two click episodes");

    let analyzer = ZoomAnalyzer::with_defaults();
    let keyframes = analyzer.compute_keyframes(&samples, source);

    let move_count = samples.iter().filter(|s| s.is_move()).count();
    assert_eq!(keyframes.len(), move_count);

    for kf in &keyframes {
        assert!(kf.viewport.within(source));
    }

    // Hold phase of the first episode: zoomed to half frame.
    let held = interpolated_rect(&keyframes, 2.0, source);
    assert!((held.w - 960.0).abs() < 1.0);

    // Between the episodes the camera has fully relaxed.
    let relaxed = interpolated_rect(&keyframes, 3.5, source);
    assert!((relaxed.w - 1920.0).abs() < 1.0);
}

#[test]
fn trajectory_is_deterministic_across_runs() {
    let samples = load_fixture_samples();
    let source = SourceSize::new(1920.0, 1080.0);

    let first = ZoomAnalyzer::with_defaults().compute_keyframes(&samples, source);
    let second = ZoomAnalyzer::with_defaults().compute_keyframes(&samples, source);

    assert_eq!(first.len(), second.len());
    assert_eq!(trajectory_signature(&first), trajectory_signature(&second));
}
