//! Camglide Render Engine
//!
//! Deterministic compositing pipeline that turns decoded source frames
//! plus a cursor-driven zoom trajectory into styled output frames for
//! export or live preview.
//!
//! # Pipeline Architecture
//!
//! ```text
//! source frames ──┐
//!                 ├── Crop/Scale (zoom keyframes)
//! events.jsonl ───┘          │
//!                            ├── Rounded Corner Mask
//!                            │
//!                            ├── Drop Shadow
//!                            │
//!                            ├── Gradient Background
//!                            ▼
//!                 Styled Canvas (exact output size)
//!                            │
//!                     ┌──────┴──────┐
//!                     ▼             ▼
//!                  Export        Preview
//!               (every frame)  (every 6th)
//! ```

pub mod assets;
pub mod compositor;
pub mod export;
pub mod preview;
pub mod session;

pub use assets::CompositeAssets;
pub use compositor::{compose_frame, SourceFrame};
pub use export::*;
pub use preview::{PreviewFrame, PreviewRenderer, PreviewSlot, DEFAULT_PREVIEW_STRIDE};
pub use session::{FrameGeometry, RenderSession};
