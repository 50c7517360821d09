//! Camglide Zoom Engine — The Virtual Camera
//!
//! Turns a cursor event log into a continuous-time camera trajectory:
//! - **Clustering:** Group clicks into zoom episodes with eased phases
//! - **Keyframes:** One low-pass-filtered viewport per move sample
//! - **Interpolation:** Smoothstep blending between sparse keyframes
//!
//! This crate is pure computation — no I/O, no platform dependencies.
//! All inputs are data; all outputs are data. Every function is total:
//! a malformed cursor trace degrades the trajectory, never the pipeline.

pub mod cluster;
pub mod easing;
pub mod interp;
pub mod keyframes;

pub use cluster::{build_clusters, ClickCluster};
pub use interp::interpolated_rect;
pub use keyframes::{ZoomAnalyzer, ZoomConfig};
