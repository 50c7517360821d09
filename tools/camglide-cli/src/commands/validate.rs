//! Validate a cursor log file.

use std::path::PathBuf;

use camglide_session_model::{parse_header, parse_samples};

pub fn run(log: PathBuf) -> anyhow::Result<()> {
    println!("Validating cursor log: {}", log.display());

    let content = std::fs::read_to_string(&log)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", log.display()))?;

    let header = parse_header(&content);
    match &header {
        Some(header) => {
            println!("  Schema: {}", header.schema_version);
            println!("  Started: {}", header.started_at);
            println!(
                "  Source: {}x{}",
                header.source_width, header.source_height
            );
            println!("  Sample rate: {} Hz", header.sample_rate_hz);
        }
        None => println!("  No header line (pass --source-width/--source-height to analyze)"),
    }

    let samples = parse_samples(&content);
    let moves = samples.iter().filter(|s| s.is_move()).count();
    let clicks = samples.iter().filter(|s| s.is_click()).count();
    println!(
        "  Samples: {} ({moves} moves, {clicks} clicks)",
        samples.len()
    );

    if samples.is_empty() {
        println!("\nLog parsed but holds no samples; rendering would pin the full frame.");
        return Ok(());
    }

    let duration = samples.last().map(|s| s.timestamp).unwrap_or(0.0);
    println!("  Duration: {duration:.2}s");

    let mut issues = Vec::new();
    let out_of_order = samples
        .windows(2)
        .filter(|pair| pair[1].timestamp < pair[0].timestamp)
        .count();
    if out_of_order > 0 {
        issues.push(format!("{out_of_order} sample(s) out of chronological order"));
    }
    if samples.iter().any(|s| s.timestamp < 0.0) {
        issues.push("negative timestamps present".to_string());
    }
    if let Some(header) = &header {
        let (w, h) = (header.source_width as f64, header.source_height as f64);
        let outside = samples
            .iter()
            .filter(|s| s.x < 0.0 || s.y < 0.0 || s.x > w || s.y > h)
            .count();
        if outside > 0 {
            issues.push(format!(
                "{outside} sample(s) outside the {}x{} source bounds",
                header.source_width, header.source_height
            ));
        }
    }

    if issues.is_empty() {
        println!("\nLog is valid.");
    } else {
        println!("\nValidation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
        println!(
            "\n{} issue(s) found. Analysis still runs; viewports stay clamped in bounds.",
            issues.len()
        );
    }

    Ok(())
}
