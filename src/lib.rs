// ============================================================================
// Pi Search Library
// Parallel arbitrary-precision pi generation and digit-sequence search
// ============================================================================

//! # Pi Search
//!
//! Computes decimal approximations of pi with the Chudnovsky series and
//! searches the resulting digits for substrings.
//!
//! ## Features
//!
//! - **Arbitrary precision** decimals with correctly rounded division
//! - **Parallel term evaluation** on a bounded crossbeam worker pool
//! - **Deterministic results** for any pool size
//! - **Lock-free factorial cache** shared by all workers
//! - **Substring search** through a verified hash index or Boyer-Moore
//!
//! ## Example
//!
//! ```rust
//! use pi_search::prelude::*;
//! use std::sync::Arc;
//!
//! let calculator = PiCalculatorBuilder::new()
//!     .workers(4)
//!     .event_handler(Arc::new(NoOpEventHandler))
//!     .build()
//!     .unwrap();
//!
//! let ctx = PrecisionContext::new(30, RoundingPolicy::HalfEven).unwrap();
//! let pi = calculator.calculate(3, &ctx, true).unwrap();
//! assert_eq!(pi.to_string(), "3.14159265358979323846264338328");
//!
//! let searcher = HashSearcher::new(digit_string(&pi));
//! assert_eq!(searcher.search("2643"), 21);
//! ```

pub mod domain;
pub mod engine;
pub mod errors;
pub mod interfaces;
pub mod numeric;
pub mod search;
pub mod utils;

use engine::PiCalculator;
use errors::PiResult;
use numeric::{PrecisionContext, RoundingPolicy};

/// Approximate pi from terms `0..=term_count` to `significant_digits`
/// digits (half-even rounding, default configuration).
///
/// # Errors
/// - `Configuration` if `significant_digits` is not positive
/// - `InvalidArgument` if `term_count` is negative
///
/// ```
/// assert_eq!(pi_search::calculate(0, 5, false).unwrap(), "3.1416");
/// ```
pub fn calculate(term_count: i64, significant_digits: i64, use_cache: bool) -> PiResult<String> {
    let ctx = PrecisionContext::new(significant_digits, RoundingPolicy::HalfEven)?;
    let pi = PiCalculator::with_defaults().calculate(term_count, &ctx, use_cache)?;
    Ok(pi.to_string())
}

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{CalculationId, CalculatorConfig, PartialSum, Term};
    pub use crate::engine::{
        create_from_config, FactorialCache, FactorialMode, ParallelReducer, PiCalculator,
        PiCalculatorBuilder, TermEvaluator,
    };
    pub use crate::errors::{CancelReason, ErrorKind, PiError, PiResult};
    pub use crate::interfaces::{
        CalculationEvent, EventHandler, FactorialSource, LoggingEventHandler, NoOpEventHandler,
    };
    pub use crate::numeric::{BigDecimal, NumericError, PrecisionContext, RoundingPolicy};
    pub use crate::search::{digit_string, BoyerMoore, HashSearcher, IndexRepository};
    pub use crate::utils::CancellationToken;
}

#[cfg(test)]
mod integration_tests {
    use super::prelude::*;
    use super::calculate;
    use std::sync::Arc;

    /// First 200 decimals of pi
    const PI_REFERENCE: &str = concat!(
        "3.",
        "14159265358979323846264338327950288419716939937510",
        "58209749445923078164062862089986280348253421170679",
        "82148086513282306647093844609550582231725359408128",
        "48111745028410270193852110555964462294895493038196",
    );

    fn correct_digits(value: &BigDecimal) -> usize {
        let reference = PI_REFERENCE.replace('.', "");
        digit_string(value)
            .bytes()
            .zip(reference.bytes())
            .take_while(|(a, b)| a == b)
            .count()
    }

    #[test]
    fn test_known_value() {
        let pi = calculate(10, 17, false).unwrap();
        assert!(pi.starts_with("3.1415926535897932"), "{}", pi);
    }

    #[test]
    fn test_single_term_boundary() {
        assert_eq!(calculate(0, 5, false).unwrap(), "3.1416");
    }

    #[test]
    fn test_deterministic_across_pool_sizes() {
        let ctx = PrecisionContext::new(17, RoundingPolicy::HalfEven).unwrap();
        let expected = calculate(10, 17, true).unwrap();

        for run in 0..100 {
            let workers = run % 8 + 1;
            let calculator = PiCalculatorBuilder::new().workers(workers).build().unwrap();
            let pi = calculator.calculate(10, &ctx, true).unwrap();
            assert_eq!(pi.to_string(), expected, "run {} with {} workers", run, workers);
        }
    }

    #[test]
    fn test_cache_modes_agree() {
        for term_count in [0, 5, 20] {
            for digits in [10, 30] {
                assert_eq!(
                    calculate(term_count, digits, true).unwrap(),
                    calculate(term_count, digits, false).unwrap(),
                    "term_count={} digits={}",
                    term_count,
                    digits
                );
            }
        }
    }

    #[test]
    fn test_convergence() {
        let calculator = PiCalculator::with_defaults();
        let ctx = PrecisionContext::new(120, RoundingPolicy::HalfEven).unwrap();

        let mut previous = 0;
        for term_count in 0..=6usize {
            let pi = calculator.calculate(term_count as i64, &ctx, true).unwrap();
            let digits = correct_digits(&pi);

            assert!(digits >= 13 * (term_count + 1), "{} terms: {} digits", term_count, digits);
            if term_count > 0 {
                let gained = digits - previous;
                assert!((11..=17).contains(&gained), "gained {} digits", gained);
            }
            previous = digits;
        }
    }

    #[test]
    fn test_zero_precision_rejected() {
        let err = calculate(10, 0, true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err = calculate(10, -4, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_negative_term_count_rejected() {
        let err = calculate(-1, 10, true).unwrap_err();
        assert_eq!(
            err,
            PiError::InvalidArgument {
                name: "term_count",
                value: -1
            }
        );
    }

    #[test]
    fn test_decimal128_context() {
        let pi = PiCalculator::with_defaults()
            .calculate(4, &PrecisionContext::decimal128(), true)
            .unwrap();
        assert_eq!(pi.to_string(), "3.141592653589793238462643383279503");

        let boundary = pi.to_decimal().unwrap();
        assert_eq!(boundary.to_string(), "3.141592653589793238462643383");
    }

    #[test]
    fn test_search_computed_digits() {
        let ctx = PrecisionContext::new(100, RoundingPolicy::Down).unwrap();
        let pi = PiCalculator::with_defaults().calculate(8, &ctx, true).unwrap();
        let digits = digit_string(&pi);
        assert_eq!(digits.len(), 100);

        let hashed = HashSearcher::new(digits.as_str());
        for query in ["999999", "26433", "0628620899", "1", "314"] {
            let expected = digits.find(query).unwrap_or(digits.len());
            assert_eq!(hashed.search(query), expected, "{}", query);
            assert_eq!(BoyerMoore::new(query).search(&digits), expected, "{}", query);
        }
    }

    #[test]
    fn test_logging_handler_end_to_end() {
        let calculator = create_from_config(
            CalculatorConfig::default(),
            Arc::new(LoggingEventHandler),
        )
        .unwrap();
        let ctx = PrecisionContext::new(25, RoundingPolicy::HalfEven).unwrap();
        assert!(calculator.calculate(2, &ctx, true).is_ok());
    }
}
