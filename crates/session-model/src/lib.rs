//! Camglide Session Model
//!
//! Defines the core data contracts for a recording session:
//! - **Events:** Timestamped cursor samples (moves, clicks) and their JSONL
//!   log format
//! - **Log:** The shared append-only event log with snapshot-on-read access
//! - **Geometry:** Pixel-space rectangles and points for camera framing
//! - **Keyframes:** The virtual-camera trajectory produced by the zoom engine
//! - **Settings:** The immutable render configuration snapshot and its
//!   gradient/resolution presets
//!
//! All coordinates are in source pixel space; timestamps are fractional
//! seconds since session start.

pub mod event;
pub mod geometry;
pub mod keyframe;
pub mod log;
pub mod settings;

pub use event::*;
pub use geometry::*;
pub use keyframe::*;
pub use log::*;
pub use settings::*;
