use tokio::time::{Duration, Instant};

/// A monotonic time source, read as elapsed time since an arbitrary fixed
/// epoch.
///
/// The reading must never regress during normal operation; wall-clock
/// adjustments must not be fed through this trait. A regressing reading is
/// tolerated but forces a spurious full-window reset.
pub trait Clock {
    fn elapsed(&self) -> Duration;
}

/// Default [`Clock`] anchored to a [`tokio::time::Instant`] captured at
/// construction. Under a paused runtime it follows
/// [`tokio::time::advance`], so time-based advancement is deterministic in
/// tests.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn elapsed(&self) -> Duration {
        self.epoch.elapsed()
    }
}
