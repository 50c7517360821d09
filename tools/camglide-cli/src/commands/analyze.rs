//! Compute zoom keyframes for a cursor log and report statistics.

use std::path::PathBuf;

use camglide_session_model::{parse_header, parse_samples, SourceSize, ZoomKeyframe};
use camglide_zoom_engine::{build_clusters, ZoomAnalyzer};
use serde::Serialize;

/// Self-describing trajectory dump written by `--json`.
#[derive(Serialize)]
struct TrajectoryDump {
    source: SourceSize,
    max_zoom: f64,
    keyframes: Vec<ZoomKeyframe>,
}

pub fn run(
    log: PathBuf,
    source_width: Option<u32>,
    source_height: Option<u32>,
    max_zoom: f64,
    json: Option<PathBuf>,
) -> anyhow::Result<()> {
    println!("Analyzing cursor log: {}", log.display());

    let content = std::fs::read_to_string(&log)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", log.display()))?;
    let samples = parse_samples(&content);

    let source = match (parse_header(&content), source_width, source_height) {
        (_, Some(w), Some(h)) => SourceSize::from_pixels(w, h),
        (Some(header), _, _) => {
            SourceSize::from_pixels(header.source_width, header.source_height)
        }
        _ => {
            return Err(anyhow::anyhow!(
                "Log has no header; pass --source-width and --source-height"
            ));
        }
    };

    println!("  Source: {}x{}", source.width, source.height);
    println!("  Samples: {}", samples.len());

    let clusters = build_clusters(&samples);
    println!("  Click clusters: {}", clusters.len());
    for (i, cluster) in clusters.iter().enumerate() {
        println!(
            "    #{}: {} click(s), window {:.2}s - {:.2}s",
            i + 1,
            cluster.click_count(),
            cluster.zoom_in_start,
            cluster.zoom_out_end
        );
    }

    let keyframes = ZoomAnalyzer::with_max_zoom(max_zoom).compute_keyframes(&samples, source);
    println!("  Keyframes: {}", keyframes.len());

    let zoomed = keyframes
        .iter()
        .filter(|k| k.viewport.w < source.width - 1e-6)
        .count();
    println!("  Zoomed keyframes: {zoomed}");

    if let Some(tightest) = keyframes
        .iter()
        .min_by(|a, b| a.viewport.w.total_cmp(&b.viewport.w))
    {
        println!(
            "  Tightest viewport: {:.0}x{:.0} at t={:.2}s (zoom {:.2}x)",
            tightest.viewport.w,
            tightest.viewport.h,
            tightest.time,
            source.width / tightest.viewport.w
        );
    }

    if let Some(path) = json {
        let dump = TrajectoryDump {
            source,
            max_zoom,
            keyframes,
        };
        std::fs::write(&path, serde_json::to_string_pretty(&dump)?)?;
        println!("\nKeyframe trajectory written to {}", path.display());
    }

    Ok(())
}
