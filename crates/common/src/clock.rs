//! Clock and timing utilities.
//!
//! Cursor samples and video frames are both stamped in seconds relative to a
//! fixed session epoch (the moment recording started). This module provides:
//! - the session epoch clock used by event-log producers
//! - a rate gate for work that runs at a reduced cadence, such as progress
//!   emission

use std::time::Instant;

/// Monotonic clock anchored to the start of a recording session.
///
/// Every timestamp it hands out is seconds since the epoch, matching the
/// time base of cursor samples and frame presentation timestamps.
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// The instant the session started.
    epoch: Instant,

    /// Wall-clock time at epoch (ISO 8601 string), kept for log headers.
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Seconds elapsed since the session started.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// The underlying epoch instant.
    pub fn epoch(&self) -> Instant {
        self.epoch
    }
}

/// Rate gate for work that should run at a fixed maximum cadence.
///
/// The caller supplies the current time in seconds against any monotonic
/// base: media timestamps for playback-coupled work, wall-clock elapsed
/// seconds for progress emission.
#[derive(Debug)]
pub struct RateController {
    min_interval_secs: f64,
    last_tick_secs: Option<f64>,
}

impl RateController {
    /// Create a controller targeting the given Hz rate.
    pub fn new(target_hz: f64) -> Self {
        let hz = if target_hz > 0.0 { target_hz } else { 1.0 };
        Self {
            min_interval_secs: 1.0 / hz,
            last_tick_secs: None,
        }
    }

    /// Check whether enough media time has passed for the next tick.
    /// Returns true and advances internal state if ready.
    /// The first call always returns true.
    pub fn should_tick(&mut self, now_secs: f64) -> bool {
        match self.last_tick_secs {
            None => {
                self.last_tick_secs = Some(now_secs);
                true
            }
            Some(last) if now_secs - last >= self.min_interval_secs => {
                self.last_tick_secs = Some(now_secs);
                true
            }
            _ => false,
        }
    }

    /// Minimum interval between ticks, in seconds.
    pub fn interval_secs(&self) -> f64 {
        self.min_interval_secs
    }
}
