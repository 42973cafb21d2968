//! Process-wide z-index stacking.
//!
//! Every overlay pulls a fresh value each time its geometry is (re)computed,
//! so the most recently touched overlay paints on top.

use std::sync::atomic::{AtomicU64, Ordering};

/// First z-index handed out by [`GLOBAL_STACK`].
pub const BASE_Z_INDEX: u64 = 2000;

/// Strictly increasing z-index source.
///
/// Values are never reused, decremented or reset.
#[derive(Debug)]
pub struct StackingCounter {
    next: AtomicU64,
}

impl StackingCounter {
    /// Create a counter whose first value is `base`.
    #[must_use]
    pub const fn new(base: u64) -> Self {
        Self {
            next: AtomicU64::new(base),
        }
    }

    /// Take the next z-index.
    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for StackingCounter {
    fn default() -> Self {
        Self::new(BASE_Z_INDEX)
    }
}

/// The counter shared by every overlay in the process.
pub static GLOBAL_STACK: StackingCounter = StackingCounter::new(BASE_Z_INDEX);

/// Take the next process-wide z-index.
pub fn next_z_index() -> u64 {
    GLOBAL_STACK.next()
}
