//! Generation stamps for cancelling stale passes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// A render or highlight pass number. Later passes compare greater.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Generation(pub u64);

/// Monotonic pass counter shared between a session and its in-flight jobs.
#[derive(Clone, Debug, Default)]
pub struct GenerationCounter {
    current: Arc<AtomicU64>,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Generation {
        Generation(self.current.load(Ordering::Acquire))
    }

    /// Starts a new pass. Every token issued before this call becomes stale.
    pub fn advance(&self) -> CancellationToken {
        let stamp = self.current.fetch_add(1, Ordering::AcqRel) + 1;
        CancellationToken {
            counter: Arc::clone(&self.current),
            stamp: Generation(stamp),
        }
    }

    /// A token for the current pass, without starting a new one.
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            counter: Arc::clone(&self.current),
            stamp: self.current(),
        }
    }
}

/// Stamp taken at the start of a pass.
#[derive(Clone, Debug)]
pub struct CancellationToken {
    counter: Arc<AtomicU64>,
    stamp: Generation,
}

impl CancellationToken {
    /// A token nothing can cancel.
    pub fn detached() -> Self {
        GenerationCounter::new().token()
    }

    pub fn generation(&self) -> Generation {
        self.stamp
    }

    /// True once a newer pass has started on the same counter.
    pub fn is_cancelled(&self) -> bool {
        self.counter.load(Ordering::Acquire) != self.stamp.0
    }
}
