//! Time sources for the scheduler.

use std::cell::Cell;
use std::rc::Rc;

use web_time::{Duration, Instant};

/// Source of the timestamps the scheduler diffs between ticks.
pub trait Clock {
    /// Current time.
    fn now(&self) -> Instant;
}

/// Wall clock (`performance.now()` on WASM).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-advanced clock for headless hosts and deterministic tests.
///
/// Clones share the same time, so a host can keep one handle and give
/// another to the scheduler.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    /// Clock frozen at the current wall time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Move time forward by fractional milliseconds.
    pub fn advance_ms(&self, ms: f64) {
        let nanos = (ms.max(0.0) * 1_000_000.0).round() as u64;
        self.advance(Duration::from_nanos(nanos));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}
