use std::sync::RwLock;

use tokio::time::Duration;

use crate::{
    bucket::{Bucket, Ring},
    clock::{Clock, MonotonicClock},
};

/// A rolling window of `size` buckets, each covering `interval` of time.
///
/// [`add`](RollingWindow::add) records a value into the bucket covering
/// "now", lazily resetting any buckets whose slice has expired since the
/// last write. [`reduce`](RollingWindow::reduce) visits the buckets still
/// inside the window, oldest to newest, without advancing anything.
///
/// Both methods take `&self`: writes hold an exclusive lock, reads a shared
/// one, so `reduce` calls may run concurrently with each other.
#[derive(Debug)]
pub struct RollingWindow<C = MonotonicClock> {
    size: usize,
    interval: Duration,
    ignore_current: bool,
    clock: C,
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    ring: Ring,
    /// Index of the bucket currently being written, always in `[0, size)`.
    offset: usize,
    /// Start boundary of the bucket at `offset`, aligned to a whole multiple
    /// of `interval` past the clock epoch.
    last_time: Duration,
}

impl RollingWindow {
    /// Returns a window of `size` buckets of width `interval`, timed by a
    /// [`MonotonicClock`] anchored at this call.
    ///
    /// # Panics
    ///
    /// If `size` is zero.
    pub fn new(size: usize, interval: Duration) -> Self {
        Self::with_clock(size, interval, MonotonicClock::new())
    }
}

impl<C: Clock> RollingWindow<C> {
    /// Like [`RollingWindow::new`], but reads time from the given clock.
    ///
    /// # Panics
    ///
    /// If `size` is zero.
    pub fn with_clock(size: usize, interval: Duration, clock: C) -> Self {
        assert!(size >= 1, "window must have at least one bucket (size = {size})");
        let last_time = clock.elapsed();
        RollingWindow {
            size,
            interval,
            ignore_current: false,
            clock,
            inner: RwLock::new(Inner {
                ring: Ring::new(size),
                offset: 0,
                last_time,
            }),
        }
    }

    /// Excludes the in-progress bucket from [`reduce`](RollingWindow::reduce)
    /// while no full interval has elapsed, since that bucket holds partial
    /// data.
    pub fn ignore_current_bucket(mut self) -> Self {
        self.ignore_current = true;
        self
    }

    /// Records `value` into the current bucket.
    pub fn add(&self, value: f64) {
        let mut inner = self.inner.write().unwrap();
        // The clock is read under the lock so that time observations are
        // ordered with state updates; a pre-lock read racing another writer
        // across an interval boundary would look like a regression and wipe
        // the window.
        let now = self.clock.elapsed();
        self.update_offset(&mut inner, now);
        let offset = inner.offset;
        inner.ring.add(offset, value);
    }

    /// Invokes `f` once per valid bucket, oldest to newest. The in-progress
    /// bucket is skipped if [`ignore_current_bucket`] was set and no full
    /// interval has elapsed; buckets that have fallen out of the window are
    /// skipped always. Never mutates the window: a long pause since the last
    /// write shows up here as fewer (possibly zero) visited buckets.
    ///
    /// [`ignore_current_bucket`]: RollingWindow::ignore_current_bucket
    pub fn reduce<F>(&self, mut f: F)
    where
        F: FnMut(&Bucket),
    {
        let inner = self.inner.read().unwrap();
        // Read the clock under the lock; see `add`.
        let now = self.clock.elapsed();
        let span = self.span(&inner, now);
        let valid = if span == 0 && self.ignore_current {
            self.size - 1
        } else {
            self.size - span
        };
        if valid > 0 {
            // Buckets at (offset + 1 ..= offset + span) are stale; the valid
            // range starts right after them and wraps around to offset.
            let start = (inner.offset + span + 1) % self.size;
            inner.ring.reduce(start, valid, &mut f);
        }
    }

    /// Whole intervals elapsed since `last_time`, clamped to `size` once the
    /// entire window is stale. A clock reading before `last_time` also maps
    /// to `size`: downstream handles both the same way, by resetting every
    /// bucket and starting fresh.
    fn span(&self, inner: &Inner, now: Duration) -> usize {
        let Some(elapsed) = now.checked_sub(inner.last_time) else {
            return self.size;
        };
        let span = elapsed.as_nanos() / self.interval.as_nanos();
        if span < self.size as u128 {
            span as usize
        } else {
            self.size
        }
    }

    /// Advances the cursor to the bucket covering `now`, resetting every
    /// bucket whose slice expired in between. Write path only; `reduce`
    /// never calls this.
    fn update_offset(&self, inner: &mut Inner, now: Duration) {
        let span = self.span(inner, now);
        if span == 0 {
            return;
        }
        if span == self.size {
            tracing::trace!(size = self.size, "entire window elapsed; resetting all buckets");
        }
        for i in 0..span {
            inner.ring.reset_bucket(inner.offset + i + 1);
        }
        inner.offset = (inner.offset + span) % self.size;
        // Snap last_time to the interval boundary at or before now, rather
        // than to now itself: span is computed by integer division, and any
        // remainder left in the anchor would compound across advances.
        inner.last_time = match now.checked_sub(inner.last_time) {
            Some(elapsed) => {
                let rem = elapsed.as_nanos() % self.interval.as_nanos();
                // rem < interval, but the nanosecond count may still exceed
                // u64; rebuild the Duration from whole seconds to stay exact.
                const NANOS_PER_SEC: u128 = 1_000_000_000;
                now - Duration::new((rem / NANOS_PER_SEC) as u64, (rem % NANOS_PER_SEC) as u32)
            }
            // The clock regressed and every bucket was just reset; restart
            // the window from the current reading. Later advances align to
            // this new anchor, not to the pre-regression interval grid.
            None => now,
        };
    }
}
