/// Aggregate of the observations recorded within one time slice.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bucket {
    /// Sum of all values added to this slice.
    pub sum: f64,
    /// Number of values added to this slice.
    pub count: u64,
}

impl Bucket {
    pub(crate) fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub(crate) fn reset(&mut self) {
        self.sum = 0.0;
        self.count = 0;
    }
}

/// Fixed-length ring of buckets, addressed modulo its size. Allocated once;
/// never resized.
#[derive(Debug)]
pub(crate) struct Ring {
    buckets: Box<[Bucket]>,
}

impl Ring {
    pub(crate) fn new(size: usize) -> Self {
        Ring {
            buckets: vec![Bucket::default(); size].into_boxed_slice(),
        }
    }

    pub(crate) fn add(&mut self, offset: usize, value: f64) {
        let size = self.buckets.len();
        self.buckets[offset % size].add(value);
    }

    pub(crate) fn reset_bucket(&mut self, offset: usize) {
        let size = self.buckets.len();
        self.buckets[offset % size].reset();
    }

    /// Visits `count` buckets starting at `start`, oldest to newest. The
    /// visitor gets a shared reference; reads only.
    pub(crate) fn reduce<F>(&self, start: usize, count: usize, f: &mut F)
    where
        F: FnMut(&Bucket),
    {
        let size = self.buckets.len();
        for i in 0..count {
            f(&self.buckets[(start + i) % size]);
        }
    }
}
