//! Error types shared across camglide crates.

use std::path::PathBuf;

/// Top-level error type for camglide operations.
#[derive(Debug, thiserror::Error)]
pub enum CamglideError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Event log error: {message}")]
    Events { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    /// Output canvas allocation failed. Kept as its own variant so export
    /// callers can tell allocation failure apart from generic render errors.
    #[error("Failed to create output buffer ({width}x{height})")]
    BufferCreation { width: u32, height: u32 },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using CamglideError.
pub type CamglideResult<T> = Result<T, CamglideError>;

impl CamglideError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn events(msg: impl Into<String>) -> Self {
        Self::Events {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn buffer_creation(width: u32, height: u32) -> Self {
        Self::BufferCreation { width, height }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    /// True when the error is the canvas-allocation failure, which is fatal
    /// for the whole job rather than recoverable per frame.
    pub fn is_buffer_creation(&self) -> bool {
        matches!(self, Self::BufferCreation { .. })
    }
}
