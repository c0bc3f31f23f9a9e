// ============================================================================
// Factorial Cache
// Exact n! with optional memoization safe for concurrent readers
// ============================================================================

use crate::interfaces::FactorialSource;
use crossbeam_skiplist::SkipMap;
use num_bigint::BigUint;
use num_traits::One;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorialMode {
    /// Recompute the product on every call
    Uncached,
    /// Memoize every n! ever computed
    Cached,
}

/// Factorial supplier for term evaluation.
///
/// In cached mode the table is a lock-free `SkipMap` holding a contiguous
/// run `0!..=m!`. Hits are plain lookups and never take a lock. Misses
/// extend the run bottom-up under a single writer lock, so each n! is
/// computed at most once and no lookup ever recurses into the map.
pub struct FactorialCache {
    mode: FactorialMode,
    entries: SkipMap<u64, Arc<BigUint>>,
    /// Serializes table growth; readers never touch it
    writer: Mutex<()>,
    computations: AtomicU64,
}

impl FactorialCache {
    pub fn new(mode: FactorialMode) -> Self {
        Self {
            mode,
            entries: SkipMap::new(),
            writer: Mutex::new(()),
            computations: AtomicU64::new(0),
        }
    }

    pub fn uncached() -> Self {
        Self::new(FactorialMode::Uncached)
    }

    pub fn cached() -> Self {
        Self::new(FactorialMode::Cached)
    }

    pub fn mode(&self) -> FactorialMode {
        self.mode
    }

    /// Exact n!
    pub fn factorial(&self, n: u64) -> Arc<BigUint> {
        match self.mode {
            FactorialMode::Uncached => {
                self.computations.fetch_add(1, Ordering::Relaxed);
                Arc::new((1..=n).fold(BigUint::one(), |acc, i| acc * i))
            },
            FactorialMode::Cached => match self.entries.get(&n) {
                Some(entry) => Arc::clone(entry.value()),
                None => self.extend_to(n),
            },
        }
    }

    /// Fill the table up to `max_n` (cached mode only).
    ///
    /// Run this before fanning work out so the parallel phase is read-only.
    pub fn prepopulate(&self, max_n: u64) {
        if self.mode == FactorialMode::Cached {
            self.extend_to(max_n);
        }
    }

    /// Number of factorial values computed so far.
    ///
    /// Cached mode counts table entries created; uncached mode counts calls.
    pub fn computations(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }

    /// Number of memoized entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Grow the contiguous table so it contains `n`, returning n!.
    fn extend_to(&self, n: u64) -> Arc<BigUint> {
        let _guard = self.writer.lock();

        // Another writer may have grown the table while we waited
        if let Some(entry) = self.entries.get(&n) {
            return Arc::clone(entry.value());
        }

        let (start, mut current) = match self.entries.back() {
            Some(last) => (*last.key() + 1, Arc::clone(last.value())),
            None => {
                let one = Arc::new(BigUint::one());
                self.store(0, Arc::clone(&one));
                (1, one)
            },
        };

        for i in start..=n {
            current = Arc::new(current.as_ref() * i);
            self.store(i, Arc::clone(&current));
        }

        current
    }

    fn store(&self, n: u64, value: Arc<BigUint>) {
        self.entries.insert(n, value);
        self.computations.fetch_add(1, Ordering::Relaxed);
    }
}

impl FactorialSource for FactorialCache {
    fn factorial(&self, n: u64) -> Arc<BigUint> {
        FactorialCache::factorial(self, n)
    }

    fn prepare(&self, max_n: u64) {
        self.prepopulate(max_n);
    }

    fn is_memoized(&self) -> bool {
        self.mode == FactorialMode::Cached
    }
}

impl fmt::Debug for FactorialCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactorialCache")
            .field("mode", &self.mode)
            .field("entries", &self.entries.len())
            .field("computations", &self.computations())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FIRST_FACTORIALS: [u64; 21] = [
        1,
        1,
        2,
        6,
        24,
        120,
        720,
        5_040,
        40_320,
        362_880,
        3_628_800,
        39_916_800,
        479_001_600,
        6_227_020_800,
        87_178_291_200,
        1_307_674_368_000,
        20_922_789_888_000,
        355_687_428_096_000,
        6_402_373_705_728_000,
        121_645_100_408_832_000,
        2_432_902_008_176_640_000,
    ];

    #[test]
    fn test_standard_sequence_both_modes() {
        let cached = FactorialCache::cached();
        let uncached = FactorialCache::uncached();

        for (n, expected) in FIRST_FACTORIALS.iter().enumerate() {
            let expected = BigUint::from(*expected);
            assert_eq!(*cached.factorial(n as u64), expected, "{}! cached", n);
            assert_eq!(*uncached.factorial(n as u64), expected, "{}! uncached", n);
        }
    }

    #[test]
    fn test_prepopulated_reads_do_not_compute() {
        let cache = FactorialCache::cached();
        cache.prepopulate(30);
        assert_eq!(cache.computations(), 31);
        assert_eq!(cache.len(), 31);

        for n in 0..=30 {
            cache.factorial(n);
        }
        assert_eq!(cache.computations(), 31);
    }

    #[test]
    fn test_miss_extends_from_last_entry() {
        let cache = FactorialCache::cached();
        cache.prepopulate(5);
        assert_eq!(*cache.factorial(8), BigUint::from(40_320u32));
        assert_eq!(cache.computations(), 9);

        // Smaller prepopulation is a no-op
        cache.prepopulate(3);
        assert_eq!(cache.computations(), 9);
    }

    #[test]
    fn test_concurrent_misses_compute_once() {
        let cache = FactorialCache::cached();

        crossbeam::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|_| {
                    assert_eq!(
                        *cache.factorial(20),
                        BigUint::from(FIRST_FACTORIALS[20])
                    );
                    cache.factorial(50);
                });
            }
        })
        .unwrap();

        assert_eq!(cache.computations(), 51);
        assert_eq!(cache.len(), 51);
    }

    #[test]
    fn test_uncached_counts_calls_and_stores_nothing() {
        let cache = FactorialCache::uncached();
        cache.prepopulate(100);
        cache.factorial(10);
        cache.factorial(10);
        assert_eq!(cache.computations(), 2);
        assert!(cache.is_empty());
        assert!(!cache.is_memoized());
    }

    proptest! {
        #[test]
        fn prop_modes_agree(n in 0u64..300) {
            let cached = FactorialCache::cached();
            let uncached = FactorialCache::uncached();
            prop_assert_eq!(cached.factorial(n), uncached.factorial(n));
        }

        #[test]
        fn prop_recurrence(n in 1u64..200) {
            let cache = FactorialCache::cached();
            let previous = cache.factorial(n - 1);
            prop_assert_eq!(&*cache.factorial(n), &(previous.as_ref() * n));
        }
    }
}
