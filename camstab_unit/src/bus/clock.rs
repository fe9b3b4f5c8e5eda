//! Deterministic millisecond clock for the simulator and tests.

use std::cell::Cell;

use camstab_common::stab::bus::MonotonicClock;

/// Clock advanced explicitly by the caller.
///
/// Uses interior mutability so the loop can hold `&ManualClock` while the
/// driver advances it between ticks. Wraps like a 32-bit RTOS tick counter.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u32>,
}

impl ManualClock {
    /// Create a clock reading `start_ms`.
    pub fn new(start_ms: u32) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Advance by `ms`, wrapping on overflow.
    #[inline]
    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }

    /// Jump to an absolute reading (may go backwards).
    #[inline]
    pub fn set(&self, ms: u32) {
        self.now.set(ms);
    }
}

impl MonotonicClock for ManualClock {
    #[inline]
    fn now_millis(&self) -> u32 {
        self.now.get()
    }
}
