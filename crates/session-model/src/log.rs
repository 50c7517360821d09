//! Shared cursor event log.
//!
//! During recording, a capture-time producer appends samples while the
//! preview pipeline periodically recomputes keyframes. Readers never walk
//! the live buffer: `snapshot()` copies it under the lock, so analysis
//! always sees one consistent slice and never a position written halfway.

use std::sync::{Arc, Mutex, PoisonError};

use crate::event::CursorSample;

/// Append-only cursor sample log, safe to share between one producer and
/// any number of snapshot readers.
#[derive(Debug, Default)]
pub struct EventLog {
    samples: Mutex<Vec<CursorSample>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log already wrapped for cross-thread sharing.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Append one sample. Samples are expected in chronological order; the
    /// log does not re-sort.
    pub fn append(&self, sample: CursorSample) {
        self.guard().push(sample);
    }

    /// Append a batch of samples.
    pub fn extend(&self, samples: impl IntoIterator<Item = CursorSample>) {
        self.guard().extend(samples);
    }

    /// Copy the current contents. The lock is held only for the copy, never
    /// across analysis.
    pub fn snapshot(&self) -> Vec<CursorSample> {
        self.guard().clone()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, Vec<CursorSample>> {
        // A producer thread that panicked mid-append leaves at worst one
        // trailing sample; the log stays usable.
        self.samples
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
