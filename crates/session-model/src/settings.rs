//! Render settings and style presets.
//!
//! `ExportSettings` is the immutable configuration snapshot consumed by the
//! render pipeline. The same struct drives full-resolution export and the
//! reduced-resolution live preview; `scaled()` derives the preview variant.

use camglide_common::{CamglideError, CamglideResult};
use serde::{Deserialize, Serialize};

/// Immutable render configuration snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Output canvas width in pixels.
    pub width: u32,

    /// Output canvas height in pixels.
    pub height: u32,

    /// Output frame rate. Only 30 and 60 are supported.
    pub fps: u32,

    /// Video bitrate in kbps (0 = encoder default). Consumed by the encoder
    /// collaborator only; preview ignores it.
    pub bit_rate_kbps: u32,

    /// Background gradient preset.
    pub background: GradientPreset,

    /// Rounded corner radius of the content card, in output pixels.
    pub corner_radius: f64,

    /// Padding between canvas edge and content card, in output pixels.
    pub padding: f64,

    /// Gaussian blur sigma for the drop shadow, in output pixels.
    pub shadow_radius: f64,

    /// Whether cursor-driven auto-zoom is applied.
    pub enable_zoom: bool,

    /// Maximum zoom factor (1.0 = never zoom; practical range 1.2 - 4.0).
    pub max_zoom: f64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 60,
            bit_rate_kbps: 8000,
            background: GradientPreset::Midnight,
            corner_radius: 20.0,
            padding: 56.0,
            shadow_radius: 24.0,
            enable_zoom: true,
            max_zoom: 2.0,
        }
    }
}

impl ExportSettings {
    /// Create settings for a 16:9 resolution preset.
    pub fn for_preset(preset: ResolutionPreset, fps: u32) -> Self {
        let (width, height) = preset.dimensions();
        Self {
            width,
            height,
            fps,
            ..Self::default()
        }
    }

    /// Check every configuration invariant. Called by the drivers before any
    /// frame processing begins; an invalid snapshot never reaches the
    /// compositor.
    pub fn validate(&self) -> CamglideResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CamglideError::config(format!(
                "output dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.fps != 30 && self.fps != 60 {
            return Err(CamglideError::config(format!(
                "frame rate must be 30 or 60, got {}",
                self.fps
            )));
        }
        let min_dim = self.width.min(self.height) as f64;
        if self.padding * 2.0 >= min_dim {
            return Err(CamglideError::config(format!(
                "padding {} leaves no content area at {}x{}",
                self.padding, self.width, self.height
            )));
        }
        if self.padding < 0.0 || self.corner_radius < 0.0 || self.shadow_radius < 0.0 {
            return Err(CamglideError::config(
                "padding, corner_radius and shadow_radius must be non-negative",
            ));
        }
        if self.max_zoom < 1.0 {
            return Err(CamglideError::config(format!(
                "max_zoom must be >= 1.0, got {}",
                self.max_zoom
            )));
        }
        Ok(())
    }

    /// Content-area width: canvas minus padding on both sides.
    pub fn content_width(&self) -> f64 {
        self.width as f64 - 2.0 * self.padding
    }

    /// Content-area height: canvas minus padding on both sides.
    pub fn content_height(&self) -> f64 {
        self.height as f64 - 2.0 * self.padding
    }

    /// Derive a reduced-resolution snapshot for preview rendering.
    ///
    /// Style lengths scale with the canvas so the preview is a miniature of
    /// the export, not a re-styled one. Frame rate and bitrate carry over
    /// unchanged; dimensions never drop below 16px.
    pub fn scaled(&self, factor: f64) -> Self {
        let factor = factor.clamp(0.01, 1.0);
        Self {
            width: ((self.width as f64 * factor).round() as u32).max(16),
            height: ((self.height as f64 * factor).round() as u32).max(16),
            fps: self.fps,
            bit_rate_kbps: self.bit_rate_kbps,
            background: self.background,
            corner_radius: self.corner_radius * factor,
            padding: self.padding * factor,
            shadow_radius: self.shadow_radius * factor,
            enable_zoom: self.enable_zoom,
            max_zoom: self.max_zoom,
        }
    }
}

/// Background gradient palette.
///
/// A closed set: every preset maps to a fixed pair of RGBA stops. Styling is
/// picked by name, never by arbitrary user-supplied colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GradientPreset {
    /// Deep blue into violet.
    #[default]
    Midnight,
    /// Teal into steel blue.
    Ocean,
    /// Burnt orange into magenta.
    Sunset,
    /// Dark green into sea green.
    Forest,
    /// Charcoal into slate gray.
    Graphite,
}

impl GradientPreset {
    pub const ALL: [GradientPreset; 5] = [
        GradientPreset::Midnight,
        GradientPreset::Ocean,
        GradientPreset::Sunset,
        GradientPreset::Forest,
        GradientPreset::Graphite,
    ];

    /// Gradient stops as (start, end) RGBA, start at the bottom-left.
    pub fn colors(&self) -> ([u8; 4], [u8; 4]) {
        match self {
            GradientPreset::Midnight => ([16, 24, 64, 255], [88, 28, 135, 255]),
            GradientPreset::Ocean => ([13, 92, 99, 255], [70, 130, 180, 255]),
            GradientPreset::Sunset => ([194, 65, 12, 255], [190, 24, 93, 255]),
            GradientPreset::Forest => ([20, 83, 45, 255], [52, 153, 131, 255]),
            GradientPreset::Graphite => ([26, 26, 26, 255], [75, 85, 99, 255]),
        }
    }

    /// Preset name as used in logs, settings files and the CLI.
    pub fn name(&self) -> &'static str {
        match self {
            GradientPreset::Midnight => "midnight",
            GradientPreset::Ocean => "ocean",
            GradientPreset::Sunset => "sunset",
            GradientPreset::Forest => "forest",
            GradientPreset::Graphite => "graphite",
        }
    }

    /// Look up a preset by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// Standard 16:9 output resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionPreset {
    #[serde(rename = "720p")]
    Hd720,
    #[serde(rename = "1080p")]
    Hd1080,
    #[serde(rename = "1440p")]
    Qhd1440,
    #[serde(rename = "2160p")]
    Uhd2160,
}

impl ResolutionPreset {
    pub const ALL: [ResolutionPreset; 4] = [
        ResolutionPreset::Hd720,
        ResolutionPreset::Hd1080,
        ResolutionPreset::Qhd1440,
        ResolutionPreset::Uhd2160,
    ];

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            ResolutionPreset::Hd720 => (1280, 720),
            ResolutionPreset::Hd1080 => (1920, 1080),
            ResolutionPreset::Qhd1440 => (2560, 1440),
            ResolutionPreset::Uhd2160 => (3840, 2160),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResolutionPreset::Hd720 => "720p",
            ResolutionPreset::Hd1080 => "1080p",
            ResolutionPreset::Qhd1440 => "1440p",
            ResolutionPreset::Uhd2160 => "2160p",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ExportSettings::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_dimensions() {
        let settings = ExportSettings {
            width: 0,
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("dimensions"));
    }

    #[test]
    fn test_validate_rejects_unsupported_fps() {
        let settings = ExportSettings {
            fps: 24,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_padding_swallowing_canvas() {
        let settings = ExportSettings {
            width: 640,
            height: 360,
            padding: 180.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_submultiple_zoom() {
        let settings = ExportSettings {
            max_zoom: 0.5,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_content_area_dimensions() {
        let settings = ExportSettings::default();
        assert!((settings.content_width() - (1920.0 - 112.0)).abs() < 1e-9);
        assert!((settings.content_height() - (1080.0 - 112.0)).abs() < 1e-9);
    }

    #[test]
    fn test_preset_dimensions() {
        assert_eq!(ResolutionPreset::Uhd2160.dimensions(), (3840, 2160));
        let settings = ExportSettings::for_preset(ResolutionPreset::Hd720, 30);
        assert_eq!((settings.width, settings.height, settings.fps), (1280, 720, 30));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_scaled_shrinks_style_lengths_proportionally() {
        let settings = ExportSettings::default();
        let preview = settings.scaled(0.25);
        assert_eq!(preview.width, 480);
        assert_eq!(preview.height, 270);
        assert!((preview.padding - 14.0).abs() < 1e-9);
        assert!((preview.corner_radius - 5.0).abs() < 1e-9);
        assert_eq!(preview.fps, settings.fps);
        assert_eq!(preview.max_zoom, settings.max_zoom);
    }

    #[test]
    fn test_legacy_settings_files_fill_missing_fields() {
        let parsed: ExportSettings =
            serde_json::from_str(r#"{"width":2560,"height":1440}"#).unwrap();
        assert_eq!(parsed.width, 2560);
        assert_eq!(parsed.fps, 60);
        assert_eq!(parsed.background, GradientPreset::Midnight);
        assert!(parsed.enable_zoom);
    }

    #[test]
    fn test_gradient_preset_roundtrip_by_name() {
        for preset in GradientPreset::ALL {
            assert_eq!(GradientPreset::from_name(preset.name()), Some(preset));
            let json = serde_json::to_string(&preset).unwrap();
            assert_eq!(json, format!("\"{}\"", preset.name()));
        }
        assert_eq!(GradientPreset::from_name("plaid"), None);
    }

    #[test]
    fn test_gradient_colors_are_opaque() {
        for preset in GradientPreset::ALL {
            let (start, end) = preset.colors();
            assert_eq!(start[3], 255);
            assert_eq!(end[3], 255);
        }
    }
}
