// ============================================================================
// Factorial Source Interface
// Defines the contract term evaluation uses to obtain n!
// ============================================================================

use num_bigint::BigUint;
use std::sync::Arc;

/// Supplier of exact factorials, shared read-only by worker threads.
/// Implementations: `FactorialCache` in uncached or memoized mode.
pub trait FactorialSource: Send + Sync {
    /// Exact n!
    fn factorial(&self, n: u64) -> Arc<BigUint>;

    /// Make every factorial up to `max_n` available before a parallel phase.
    ///
    /// Called once, single-threaded, before fan-out. Sources that do not
    /// memoize can ignore it.
    fn prepare(&self, _max_n: u64) {}

    /// Whether results are memoized (for logging/events)
    fn is_memoized(&self) -> bool;
}
