// ============================================================================
// Pi Calculator
// Orchestrates factorial preparation, parallel summation and the reciprocal
// ============================================================================

use crate::domain::{CalculationId, CalculatorConfig};
use crate::engine::{FactorialCache, ParallelReducer, TermEvaluator};
use crate::errors::{PiError, PiResult};
use crate::interfaces::{CalculationEvent, EventHandler, FactorialSource, NoOpEventHandler};
use crate::numeric::{BigDecimal, PrecisionContext};
use crate::utils::{worker_count, CancellationToken};
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;

/// Chudnovsky pi calculator with a pluggable event handler.
///
/// A calculator is cheap to share: every `calculate` call owns its own
/// precision context and (unless `retain_cache` is set) its own factorial
/// table, so concurrent calls do not interfere.
pub struct PiCalculator {
    config: CalculatorConfig,

    /// Receives progress events for every calculation
    event_handler: Arc<dyn EventHandler>,

    /// Memoized factorials kept between calls when `retain_cache` is set
    retained: Mutex<Option<Arc<FactorialCache>>>,
}

impl PiCalculator {
    /// Create a calculator after validating `config`.
    pub fn new(config: CalculatorConfig, event_handler: Arc<dyn EventHandler>) -> PiResult<Self> {
        config.validate().map_err(PiError::configuration)?;

        Ok(Self {
            config,
            event_handler,
            retained: Mutex::new(None),
        })
    }

    /// Default configuration, no event handler
    pub fn with_defaults() -> Self {
        Self {
            config: CalculatorConfig::default(),
            event_handler: Arc::new(NoOpEventHandler),
            retained: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Number of factorials held by the retained table (0 when none is kept)
    pub fn retained_factorials(&self) -> usize {
        self.retained
            .lock()
            .as_ref()
            .map_or(0, |cache| cache.len())
    }

    /// Approximate pi from terms `0..=term_count`, rounded to `ctx`.
    ///
    /// `use_cache` selects memoized factorials; both modes return the same
    /// digits.
    ///
    /// # Example
    /// ```
    /// use pi_search::engine::PiCalculator;
    /// use pi_search::numeric::{PrecisionContext, RoundingPolicy};
    ///
    /// let ctx = PrecisionContext::new(17, RoundingPolicy::HalfEven).unwrap();
    /// let pi = PiCalculator::with_defaults().calculate(10, &ctx, true).unwrap();
    /// assert!(pi.to_string().starts_with("3.1415926535897932"));
    /// ```
    pub fn calculate(
        &self,
        term_count: i64,
        ctx: &PrecisionContext,
        use_cache: bool,
    ) -> PiResult<BigDecimal> {
        self.calculate_with_cancel(term_count, ctx, use_cache, &CancellationToken::new())
    }

    /// Like [`calculate`](Self::calculate), stopping early once `cancel` fires.
    ///
    /// Workers check the token between terms, so a term already being
    /// evaluated runs to completion: the call returns after at most one
    /// in-flight term per worker.
    pub fn calculate_with_cancel(
        &self,
        term_count: i64,
        ctx: &PrecisionContext,
        use_cache: bool,
        cancel: &CancellationToken,
    ) -> PiResult<BigDecimal> {
        self.check_limits(term_count, ctx)?;

        let calculation_id = CalculationId::new();
        let started = Instant::now();

        match self.run(calculation_id, term_count as u64, ctx, use_cache, cancel) {
            Ok(pi) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                tracing::info!(
                    %calculation_id,
                    term_count,
                    significant_digits = ctx.significant_digits(),
                    elapsed_ms,
                    "pi calculated"
                );
                self.event_handler.on_event(CalculationEvent::CalculationCompleted {
                    calculation_id,
                    elapsed_ms,
                    timestamp: Utc::now(),
                });
                Ok(pi)
            },
            Err(err) => {
                tracing::warn!(%calculation_id, error = %err, "pi calculation failed");
                self.event_handler.on_event(CalculationEvent::CalculationFailed {
                    calculation_id,
                    reason: err.to_string(),
                    timestamp: Utc::now(),
                });
                Err(err)
            },
        }
    }

    /// Run the calculation on tokio's blocking pool.
    #[cfg(feature = "async")]
    pub async fn calculate_async(
        self: Arc<Self>,
        term_count: i64,
        ctx: PrecisionContext,
        use_cache: bool,
    ) -> PiResult<BigDecimal> {
        tokio::task::spawn_blocking(move || self.calculate(term_count, &ctx, use_cache))
            .await
            .map_err(|err| PiError::resource_exhaustion(format!("calculation task failed: {}", err)))?
    }

    fn check_limits(&self, term_count: i64, ctx: &PrecisionContext) -> PiResult<()> {
        if term_count < 0 {
            return Err(PiError::InvalidArgument {
                name: "term_count",
                value: term_count,
            });
        }

        if term_count as u64 > self.config.max_term_count {
            return Err(PiError::resource_exhaustion(format!(
                "term count {} exceeds limit {}",
                term_count, self.config.max_term_count
            )));
        }

        if ctx.significant_digits() > self.config.max_significant_digits {
            return Err(PiError::resource_exhaustion(format!(
                "precision {} exceeds limit {}",
                ctx.significant_digits(),
                self.config.max_significant_digits
            )));
        }

        Ok(())
    }

    fn run(
        &self,
        calculation_id: CalculationId,
        term_count: u64,
        ctx: &PrecisionContext,
        use_cache: bool,
        cancel: &CancellationToken,
    ) -> PiResult<BigDecimal> {
        let working = ctx.with_extra_digits(self.config.guard_digits);
        let total = term_count as usize + 1;

        tracing::debug!(
            %calculation_id,
            term_count,
            %ctx,
            %working,
            use_cache,
            "starting pi calculation"
        );
        self.event_handler.on_event(CalculationEvent::CalculationStarted {
            calculation_id,
            term_count,
            significant_digits: ctx.significant_digits(),
            workers: worker_count(self.config.workers, total),
            timestamp: Utc::now(),
        });

        let factorials = self.factorials(use_cache);
        let max_argument = TermEvaluator::max_factorial_argument(term_count).ok_or_else(|| {
            PiError::resource_exhaustion(format!("term count {} too large", term_count))
        })?;
        factorials.prepare(max_argument);
        self.event_handler.on_event(CalculationEvent::FactorialsPrepared {
            calculation_id,
            max_argument,
            memoized: factorials.is_memoized(),
            timestamp: Utc::now(),
        });

        let mut reducer = ParallelReducer::new(self.config.workers)
            .with_events(calculation_id, Arc::clone(&self.event_handler));
        if let Some(timeout) = self.config.timeout {
            reducer = reducer.with_deadline(Instant::now() + timeout);
        }

        let sum = reducer.sum(term_count as i64, &working, factorials.as_ref(), cancel)?;

        // pi = 1 / (12 * S)
        let scaled = sum.into_value().mul(&BigDecimal::from(12));
        let pi = BigDecimal::one().div(&scaled, ctx)?;

        Ok(pi)
    }

    /// Factorial table for one calculation.
    fn factorials(&self, use_cache: bool) -> Arc<FactorialCache> {
        if !use_cache {
            return Arc::new(FactorialCache::uncached());
        }
        if !self.config.retain_cache {
            return Arc::new(FactorialCache::cached());
        }

        let mut retained = self.retained.lock();
        Arc::clone(retained.get_or_insert_with(|| Arc::new(FactorialCache::cached())))
    }
}

impl Default for PiCalculator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{CancelReason, ErrorKind};
    use crate::numeric::RoundingPolicy;
    use std::time::Duration;

    fn ctx(digits: i64) -> PrecisionContext {
        PrecisionContext::new(digits, RoundingPolicy::HalfEven).unwrap()
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<CalculationEvent>>);

    impl EventHandler for Recorder {
        fn on_event(&self, event: CalculationEvent) {
            self.0.lock().push(event);
        }
    }

    #[test]
    fn test_known_value() {
        let pi = PiCalculator::with_defaults().calculate(10, &ctx(17), false).unwrap();
        assert!(pi.to_string().starts_with("3.1415926535897932"), "{}", pi);
        assert_eq!(pi.precision(), 17);
    }

    #[test]
    fn test_single_term() {
        let pi = PiCalculator::with_defaults().calculate(0, &ctx(5), false).unwrap();
        assert_eq!(pi.to_string(), "3.1416");
    }

    #[test]
    fn test_rejects_negative_term_count() {
        let err = PiCalculator::with_defaults()
            .calculate(-1, &ctx(10), true)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_limits() {
        let config = CalculatorConfig::default()
            .with_max_term_count(5)
            .with_max_significant_digits(50);
        let calculator = PiCalculator::new(config, Arc::new(NoOpEventHandler)).unwrap();

        let err = calculator.calculate(6, &ctx(10), true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceExhaustion);

        let err = calculator.calculate(5, &ctx(51), true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceExhaustion);

        assert!(calculator.calculate(5, &ctx(50), true).is_ok());
    }

    #[test]
    fn test_unbounded_limit_still_rejects_overflowing_term_count() {
        let config = CalculatorConfig::default().with_max_term_count(u64::MAX);
        let calculator = PiCalculator::new(config, Arc::new(NoOpEventHandler)).unwrap();

        let err = calculator.calculate(i64::MAX, &ctx(10), true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceExhaustion);
        assert_eq!(calculator.retained_factorials(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = PiCalculator::new(
            CalculatorConfig::default().with_workers(0),
            Arc::new(NoOpEventHandler),
        );
        match result {
            Err(err) => assert_eq!(err.kind(), ErrorKind::Configuration),
            Ok(_) => panic!("zero workers accepted"),
        }
    }

    #[test]
    fn test_event_sequence() {
        let recorder = Arc::new(Recorder::default());
        let calculator =
            PiCalculator::new(CalculatorConfig::single_threaded(), recorder.clone()).unwrap();
        calculator.calculate(3, &ctx(20), true).unwrap();

        let events = recorder.0.lock();
        assert_eq!(events.len(), 1 + 1 + 4 + 1 + 1);
        assert!(matches!(
            events[0],
            CalculationEvent::CalculationStarted {
                term_count: 3,
                significant_digits: 20,
                workers: 1,
                ..
            }
        ));
        assert!(matches!(
            events[1],
            CalculationEvent::FactorialsPrepared {
                max_argument: 18,
                memoized: true,
                ..
            }
        ));
        assert!(events[2..6]
            .iter()
            .all(|e| matches!(e, CalculationEvent::TermEvaluated { total: 4, .. })));
        assert!(matches!(
            events[6],
            CalculationEvent::SeriesReduced { terms: 4, .. }
        ));
        assert!(matches!(
            events[7],
            CalculationEvent::CalculationCompleted { .. }
        ));
    }

    #[test]
    fn test_cancelled_calculation_reports_failure() {
        let recorder = Arc::new(Recorder::default());
        let calculator = PiCalculator::new(CalculatorConfig::default(), recorder.clone()).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = calculator
            .calculate_with_cancel(20, &ctx(30), true, &cancel)
            .unwrap_err();
        assert!(matches!(
            err,
            PiError::Cancelled {
                reason: CancelReason::Requested,
                ..
            }
        ));

        let events = recorder.0.lock();
        assert!(matches!(
            events.last(),
            Some(CalculationEvent::CalculationFailed { .. })
        ));
    }

    #[test]
    fn test_timeout() {
        let config = CalculatorConfig::default().with_timeout(Duration::from_nanos(1));
        let calculator = PiCalculator::new(config, Arc::new(NoOpEventHandler)).unwrap();

        let err = calculator.calculate(30, &ctx(50), true).unwrap_err();
        assert!(matches!(
            err,
            PiError::Cancelled {
                reason: CancelReason::TimedOut,
                ..
            }
        ));
    }

    #[test]
    fn test_retained_cache_grows_across_calls() {
        let calculator = PiCalculator::new(
            CalculatorConfig::throughput(),
            Arc::new(NoOpEventHandler),
        )
        .unwrap();
        assert_eq!(calculator.retained_factorials(), 0);

        let first = calculator.calculate(4, &ctx(25), true).unwrap();
        assert_eq!(calculator.retained_factorials(), 25);

        calculator.calculate(8, &ctx(25), true).unwrap();
        assert_eq!(calculator.retained_factorials(), 49);

        // A warm table gives the same digits as a fresh one
        let again = calculator.calculate(4, &ctx(25), true).unwrap();
        assert_eq!(again, first);
        assert_eq!(calculator.retained_factorials(), 49);

        // Uncached calls never touch the retained table
        calculator.calculate(12, &ctx(25), false).unwrap();
        assert_eq!(calculator.retained_factorials(), 49);
    }

    #[test]
    fn test_guard_digits_do_not_leak_into_result() {
        for guard in [0, 3, 10, 25] {
            let calculator = PiCalculator::new(
                CalculatorConfig::default().with_guard_digits(guard),
                Arc::new(NoOpEventHandler),
            )
            .unwrap();
            let pi = calculator.calculate(6, &ctx(40), true).unwrap();
            assert!(pi.precision() <= 40);
        }
    }

    #[test]
    fn test_rounding_policy_applies_to_result() {
        let calculator = PiCalculator::with_defaults();
        let down = PrecisionContext::new(6, RoundingPolicy::Down).unwrap();
        let up = PrecisionContext::new(6, RoundingPolicy::Up).unwrap();

        // pi = 3.14159265...
        assert_eq!(calculator.calculate(5, &down, true).unwrap().to_string(), "3.14159");
        assert_eq!(calculator.calculate(5, &up, true).unwrap().to_string(), "3.14160");
    }
}
