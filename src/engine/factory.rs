// ============================================================================
// Calculator Factory
// Creates pi calculators with proper configuration
// ============================================================================

use crate::domain::CalculatorConfig;
use crate::engine::PiCalculator;
use crate::errors::PiResult;
use crate::interfaces::{EventHandler, NoOpEventHandler};
use std::sync::Arc;
use std::time::Duration;

/// Creates a calculator from configuration
///
/// # Example
/// ```
/// use pi_search::prelude::*;
/// use pi_search::engine::factory::create_from_config;
/// use std::sync::Arc;
///
/// let calculator = create_from_config(
///     CalculatorConfig::single_threaded(),
///     Arc::new(NoOpEventHandler),
/// )
/// .unwrap();
/// assert_eq!(calculator.config().workers, Some(1));
/// ```
pub fn create_from_config(
    config: CalculatorConfig,
    event_handler: Arc<dyn EventHandler>,
) -> PiResult<PiCalculator> {
    PiCalculator::new(config, event_handler)
}

// ============================================================================
// Builder Pattern for Advanced Configuration
// ============================================================================

/// Builder for creating calculators with fluent API
///
/// # Example
/// ```
/// use pi_search::prelude::*;
/// use pi_search::engine::factory::PiCalculatorBuilder;
/// use std::sync::Arc;
///
/// let calculator = PiCalculatorBuilder::new()
///     .workers(2)
///     .guard_digits(12)
///     .event_handler(Arc::new(LoggingEventHandler))
///     .build()
///     .unwrap();
/// assert_eq!(calculator.config().guard_digits, 12);
/// ```
pub struct PiCalculatorBuilder {
    config: CalculatorConfig,
    event_handler: Arc<dyn EventHandler>,
}

impl PiCalculatorBuilder {
    pub fn new() -> Self {
        Self {
            config: CalculatorConfig::default(),
            event_handler: Arc::new(NoOpEventHandler),
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: CalculatorConfig) -> Self {
        Self {
            config,
            event_handler: Arc::new(NoOpEventHandler),
        }
    }

    // ========================================================================
    // Worker Pool
    // ========================================================================

    /// Use exactly `workers` threads
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = Some(workers);
        self
    }

    /// Size the pool to the available cores (default)
    pub fn all_cores(mut self) -> Self {
        self.config.workers = None;
        self
    }

    // ========================================================================
    // Precision and Caching
    // ========================================================================

    pub fn guard_digits(mut self, guard_digits: u64) -> Self {
        self.config.guard_digits = guard_digits;
        self
    }

    /// Keep memoized factorials between calculations
    pub fn retain_cache(mut self, retain: bool) -> Self {
        self.config.retain_cache = retain;
        self
    }

    // ========================================================================
    // Limits
    // ========================================================================

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn max_significant_digits(mut self, limit: u64) -> Self {
        self.config.max_significant_digits = limit;
        self
    }

    pub fn max_term_count(mut self, limit: u64) -> Self {
        self.config.max_term_count = limit;
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    pub fn event_handler(mut self, event_handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = event_handler;
        self
    }

    /// Build the calculator
    pub fn build(self) -> PiResult<PiCalculator> {
        create_from_config(self.config, self.event_handler)
    }

    /// Get the configuration without building (for inspection)
    pub fn get_config(&self) -> &CalculatorConfig {
        &self.config
    }
}

impl Default for PiCalculatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
