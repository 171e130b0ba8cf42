//! Fixed-capacity, time-bucketed rolling accumulator.
//!
//! A [`RollingWindow`] divides a trailing time span into a fixed number of
//! equal-length buckets and records observations into whichever bucket
//! covers "now". [`RollingWindow::reduce`] visits only the buckets still
//! inside the window, giving adaptive mechanisms (circuit breakers, load
//! shedders) a recent, decaying view of event rates in O(size) memory,
//! regardless of event volume.

mod bucket;
mod clock;
mod window;

pub use self::{
    bucket::Bucket,
    clock::{Clock, MonotonicClock},
    window::RollingWindow,
};
