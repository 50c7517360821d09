//! Cursor sample types for the camglide event stream.
//!
//! Samples are recorded in append-only JSONL format for crash safety.
//! Coordinates are in source pixel space (the producer has already scaled
//! screen points to the capture's pixel resolution) and timestamps are
//! fractional seconds since session start.

use serde::{Deserialize, Serialize};

/// A single recorded cursor sample with timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorSample {
    /// Seconds since session start. Monotonic, non-negative; duplicate
    /// timestamps are permitted and must not crash consumers.
    #[serde(rename = "t")]
    pub timestamp: f64,

    /// X position in source pixels.
    pub x: f64,

    /// Y position in source pixels.
    pub y: f64,

    /// What the cursor did at this instant.
    pub kind: SampleKind,
}

/// Discriminated sample type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleKind {
    /// Pointer position update.
    Move,
    /// Left mouse button press.
    LeftClick,
    /// Right mouse button press.
    RightClick,
}

/// Metadata header written as the first (comment) line of a cursor log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock time at session start (ISO 8601).
    pub started_at: String,

    /// Source frame dimensions in physical pixels.
    pub source_width: u32,
    pub source_height: u32,

    /// Nominal sampling rate for move samples (Hz).
    #[serde(default = "default_sample_rate")]
    pub sample_rate_hz: u32,
}

fn default_sample_rate() -> u32 {
    60
}

impl LogHeader {
    pub const SCHEMA_VERSION: &'static str = "1.0";

    /// Create a header for a new session starting now.
    pub fn new(source_width: u32, source_height: u32) -> Self {
        Self {
            schema_version: Self::SCHEMA_VERSION.to_string(),
            started_at: chrono::Utc::now().to_rfc3339(),
            source_width,
            source_height,
            sample_rate_hz: default_sample_rate(),
        }
    }
}

impl CursorSample {
    /// Create a move sample.
    pub fn move_to(timestamp: f64, x: f64, y: f64) -> Self {
        Self {
            timestamp,
            x,
            y,
            kind: SampleKind::Move,
        }
    }

    /// Create a left-click sample.
    pub fn left_click(timestamp: f64, x: f64, y: f64) -> Self {
        Self {
            timestamp,
            x,
            y,
            kind: SampleKind::LeftClick,
        }
    }

    /// Create a right-click sample.
    pub fn right_click(timestamp: f64, x: f64, y: f64) -> Self {
        Self {
            timestamp,
            x,
            y,
            kind: SampleKind::RightClick,
        }
    }

    /// Whether this sample is a click of either button.
    pub fn is_click(&self) -> bool {
        matches!(self.kind, SampleKind::LeftClick | SampleKind::RightClick)
    }

    /// Whether this sample is a pointer position update.
    pub fn is_move(&self) -> bool {
        self.kind == SampleKind::Move
    }

    /// Pointer position in source pixels.
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// Parse samples from JSONL content (one JSON object per line).
///
/// Header comments (`#`-prefixed) and blank lines are skipped; lines that
/// fail to parse are dropped with a warning. A garbled log degrades to
/// whatever parsed cleanly rather than failing the caller.
pub fn parse_samples(jsonl: &str) -> Vec<CursorSample> {
    let mut samples = Vec::new();
    for (index, line) in jsonl.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(sample) => samples.push(sample),
            Err(e) => {
                tracing::warn!(line = index + 1, error = %e, "skipping malformed cursor sample");
            }
        }
    }
    samples
}

/// Parse the `#`-prefixed header line of a cursor log, if present.
pub fn parse_header(jsonl: &str) -> Option<LogHeader> {
    let first = jsonl.lines().find(|line| !line.trim().is_empty())?;
    let first = first.trim();
    let body = first.strip_prefix('#')?.trim();
    serde_json::from_str(body).ok()
}

/// Serialize samples to JSONL, with an optional leading header comment.
pub fn serialize_samples(
    header: Option<&LogHeader>,
    samples: &[CursorSample],
) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    if let Some(header) = header {
        output.push_str("# ");
        output.push_str(&serde_json::to_string(header)?);
        output.push('\n');
    }
    for sample in samples {
        output.push_str(&serde_json::to_string(sample)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_sample_roundtrip() {
        let sample = CursorSample::move_to(1.5, 640.0, 360.5);
        let json = serde_json::to_string(&sample).unwrap();
        let parsed: CursorSample = serde_json::from_str(&json).unwrap();
        assert_eq!(sample, parsed);
    }

    #[test]
    fn test_click_sample_roundtrip() {
        let sample = CursorSample::left_click(2.25, 100.0, 900.0);
        let json = serde_json::to_string(&sample).unwrap();
        let parsed: CursorSample = serde_json::from_str(&json).unwrap();
        assert_eq!(sample, parsed);
        assert!(parsed.is_click());
    }

    #[test]
    fn test_jsonl_roundtrip_with_header() {
        let header = LogHeader::new(3840, 2160);
        let samples = vec![
            CursorSample::move_to(0.0, 0.0, 0.0),
            CursorSample::left_click(0.1, 500.0, 500.0),
            CursorSample::move_to(0.2, 600.0, 400.0),
        ];
        let jsonl = serialize_samples(Some(&header), &samples).unwrap();

        let parsed_header = parse_header(&jsonl).unwrap();
        assert_eq!(parsed_header.source_width, 3840);
        assert_eq!(parsed_header.source_height, 2160);

        let parsed = parse_samples(&jsonl);
        assert_eq!(samples, parsed);
    }

    #[test]
    fn test_parse_samples_skips_header_comment() {
        let jsonl = "# {\"schema_version\":\"1.0\",\"started_at\":\"2026-01-01T00:00:00Z\",\"source_width\":1920,\"source_height\":1080}\n{\"t\":0.0,\"x\":10.0,\"y\":20.0,\"kind\":\"move\"}\n";
        let parsed = parse_samples(jsonl);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].timestamp, 0.0);
    }

    #[test]
    fn test_parse_samples_drops_garbled_lines() {
        let jsonl = "{\"t\":0.0,\"x\":1.0,\"y\":2.0,\"kind\":\"move\"}\nnot json at all\n{\"t\":0.5,\"x\":3.0,\"y\":4.0,\"kind\":\"right_click\"}\n";
        let parsed = parse_samples(jsonl);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].kind, SampleKind::RightClick);
    }

    #[test]
    fn test_json_format_matches_record_contract() {
        let sample = CursorSample::move_to(12.345, 1000.0, 1000.0);
        let json = serde_json::to_string(&sample).unwrap();
        assert!(json.contains("\"t\":12.345"));
        assert!(json.contains("\"x\":1000.0"));
        assert!(json.contains("\"y\":1000.0"));
        assert!(json.contains("\"kind\":\"move\""));
    }

    #[test]
    fn test_header_defaults_sample_rate_for_legacy_files() {
        let raw = r#"{
            "schema_version":"1.0",
            "started_at":"2026-01-01T00:00:00Z",
            "source_width":1920,
            "source_height":1080
        }"#;

        let parsed: LogHeader = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.sample_rate_hz, 60);
    }

    #[test]
    fn test_duplicate_timestamps_are_preserved() {
        let samples = vec![
            CursorSample::move_to(1.0, 10.0, 10.0),
            CursorSample::move_to(1.0, 12.0, 10.0),
        ];
        let jsonl = serialize_samples(None, &samples).unwrap();
        let parsed = parse_samples(&jsonl);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].timestamp, parsed[1].timestamp);
    }
}
