// ============================================================================
// Calculator Configuration
// Worker pool, working precision and resource limits for pi calculation
// ============================================================================

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Extra significant digits carried by intermediate results
pub const DEFAULT_GUARD_DIGITS: u64 = 10;

/// Largest precision accepted before a calculation is refused
pub const DEFAULT_MAX_SIGNIFICANT_DIGITS: u64 = 1_000_000;

/// Largest term count accepted before a calculation is refused
pub const DEFAULT_MAX_TERM_COUNT: u64 = 100_000;

/// Comprehensive configuration for a pi calculator
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalculatorConfig {
    /// Worker threads for term evaluation
    /// None means one per available core
    pub workers: Option<usize>,

    /// Digits added to the requested precision for the series arithmetic;
    /// only the final reciprocal is rounded to the requested precision
    pub guard_digits: u64,

    /// Keep the memoized factorial table between `calculate` calls
    /// (only consulted when caching is requested)
    pub retain_cache: bool,

    /// Optional: deadline for one calculation
    /// None means no deadline
    pub timeout: Option<Duration>,

    /// Requests above this precision fail with `ResourceExhaustion`
    pub max_significant_digits: u64,

    /// Requests above this term count fail with `ResourceExhaustion`
    pub max_term_count: u64,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            workers: None,
            guard_digits: DEFAULT_GUARD_DIGITS,
            retain_cache: false,
            timeout: None,
            max_significant_digits: DEFAULT_MAX_SIGNIFICANT_DIGITS,
            max_term_count: DEFAULT_MAX_TERM_COUNT,
        }
    }
}

impl CalculatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: Set a fixed worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Builder method: Set guard digits
    pub fn with_guard_digits(mut self, guard_digits: u64) -> Self {
        self.guard_digits = guard_digits;
        self
    }

    /// Builder method: Retain the factorial cache across calculations
    pub fn with_retained_cache(mut self, retain: bool) -> Self {
        self.retain_cache = retain;
        self
    }

    /// Builder method: Set a deadline per calculation
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builder method: Set the precision limit
    pub fn with_max_significant_digits(mut self, limit: u64) -> Self {
        self.max_significant_digits = limit;
        self
    }

    /// Builder method: Set the term count limit
    pub fn with_max_term_count(mut self, limit: u64) -> Self {
        self.max_term_count = limit;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == Some(0) {
            return Err("Worker count must be positive".to_string());
        }

        if self.max_significant_digits == 0 {
            return Err("Maximum significant digits must be positive".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout.is_zero() {
                return Err("Timeout must be positive".to_string());
            }
        }

        Ok(())
    }
}

// ============================================================================
// Preset Configurations (Factory Methods)
// ============================================================================

impl CalculatorConfig {
    /// Single worker, fresh cache per calculation.
    /// Useful as a baseline when checking that results do not depend on the pool.
    pub fn single_threaded() -> Self {
        Self::default().with_workers(1)
    }

    /// One worker per core, factorial table kept warm between calls.
    /// Suited to services answering repeated requests.
    pub fn throughput() -> Self {
        Self::default().with_retained_cache(true)
    }
}
