use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

/// # Approximate Item Counter
///
/// Tracks the net number of store / delete calls made against the cache.
/// This is not the exact number of entries. Overwriting a key counts as another
/// insert, and the count keeps entries that have expired but were not swept yet.
/// Decrements saturate at zero instead of wrapping around.
#[derive(Debug, Default)]
pub(crate) struct LiveCount {
    count: AtomicUsize,
}

impl LiveCount {
    pub fn new(initial: usize) -> Self {
        Self {
            count: AtomicUsize::new(initial),
        }
    }

    #[inline]
    pub fn increment(&self) {
        self.count.fetch_add(1, Ordering::AcqRel);
    }

    #[inline]
    pub fn decrement(&self) {
        self.sub(1);
    }

    pub fn sub(&self, n: usize) {
        // never fails, the closure always returns `Some`.
        let _ = self
            .count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cur| {
                Some(cur.saturating_sub(n))
            });
    }

    #[inline]
    pub fn snapshot(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }
}
