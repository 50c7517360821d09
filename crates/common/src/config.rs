//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where rendered output is written.
    pub renders_dir: PathBuf,

    /// Default render parameters.
    pub render: RenderDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default render parameters used when a command does not override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderDefaults {
    /// Default output width in pixels.
    pub width: u32,

    /// Default output height in pixels.
    pub height: u32,

    /// Default output frame rate.
    pub fps: u32,

    /// Default background gradient preset name.
    pub background: String,

    /// Render every Nth captured frame when previewing.
    pub preview_stride: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "camglide=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            renders_dir: dirs_default_renders(),
            render: RenderDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 60,
            background: "midnight".to_string(),
            preview_stride: 6,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("camglide").join("config.json")
}

/// Default renders directory.
fn dirs_default_renders() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("camglide").join("renders")
}
