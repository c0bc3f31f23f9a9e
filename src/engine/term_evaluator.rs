// ============================================================================
// Term Evaluator
// The k-th Chudnovsky term as an exact numerator over a rounded denominator
// ============================================================================
//
//   term_k = (-1)^k (6k)! (13591409 + 545140134 k)
//            -------------------------------------------
//            (3k)! (k!)^3 640320^(3k + 3/2)
//
// and 1/pi = 12 * sum(term_k).
// ============================================================================

use crate::domain::Term;
use crate::errors::{PiError, PiResult};
use crate::interfaces::FactorialSource;
use crate::numeric::{pow_ratio, BigDecimal, PrecisionContext};
use num_bigint::{BigInt, BigUint, Sign};
use num_rational::Ratio;

/// Constant term of the linear factor
pub const CHUDNOVSKY_A: u64 = 13_591_409;

/// Coefficient of k in the linear factor
pub const CHUDNOVSKY_B: u64 = 545_140_134;

/// Base of the irrational power in the denominator
pub const CHUDNOVSKY_C: u64 = 640_320;

/// Evaluates series terms against a shared factorial source.
pub struct TermEvaluator<'a> {
    factorials: &'a dyn FactorialSource,
}

impl<'a> TermEvaluator<'a> {
    pub fn new(factorials: &'a dyn FactorialSource) -> Self {
        Self { factorials }
    }

    /// Largest factorial argument needed for terms `0..=term_count`, or
    /// `None` if it does not fit in a `u64`.
    pub fn max_factorial_argument(term_count: u64) -> Option<u64> {
        term_count.checked_mul(6)
    }

    /// Compute term k, rounding the denominator and the quotient to `ctx`.
    ///
    /// # Errors
    /// - `InvalidArgument` if `k` is negative
    /// - `ResourceExhaustion` if `6k + 3` overflows a `u64`
    pub fn evaluate_term(&self, k: i64, ctx: &PrecisionContext) -> PiResult<Term> {
        if k < 0 {
            return Err(PiError::InvalidArgument { name: "k", value: k });
        }
        let k = k as u64;
        let (six, three, exponent) = Self::arguments(k)
            .ok_or_else(|| PiError::resource_exhaustion(format!("term index {} too large", k)))?;

        let six_k = self.factorials.factorial(six);
        let three_k = self.factorials.factorial(three);
        let k_fact = self.factorials.factorial(k);

        let linear = BigUint::from(CHUDNOVSKY_A) + BigUint::from(CHUDNOVSKY_B) * k;
        let sign = if k % 2 == 0 { Sign::Plus } else { Sign::Minus };
        let numerator = BigInt::from_biguint(sign, six_k.as_ref() * linear);

        let exact_part = three_k.as_ref() * k_fact.as_ref() * k_fact.as_ref() * k_fact.as_ref();
        let power = pow_ratio(
            &BigUint::from(CHUDNOVSKY_C),
            &Ratio::new(exponent, 2),
            ctx,
        )?;
        let denominator = BigDecimal::from(exact_part).mul(&power).round(ctx);

        let value = BigDecimal::from(numerator.clone()).div(&denominator, ctx)?;

        Ok(Term {
            index: k,
            numerator,
            denominator,
            value,
        })
    }

    /// `(6k, 3k, 6k + 3)`
    fn arguments(k: u64) -> Option<(u64, u64, u64)> {
        let six = k.checked_mul(6)?;
        Some((six, k * 3, six.checked_add(3)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FactorialCache;
    use crate::errors::ErrorKind;
    use crate::numeric::RoundingPolicy;

    fn ctx(digits: i64) -> PrecisionContext {
        PrecisionContext::new(digits, RoundingPolicy::HalfEven).unwrap()
    }

    #[test]
    fn test_negative_index_rejected() {
        let cache = FactorialCache::uncached();
        let evaluator = TermEvaluator::new(&cache);
        let err = evaluator.evaluate_term(-1, &ctx(10)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err, PiError::InvalidArgument { name: "k", value: -1 });
    }

    #[test]
    fn test_first_term() {
        let cache = FactorialCache::uncached();
        let evaluator = TermEvaluator::new(&cache);
        let term = evaluator.evaluate_term(0, &ctx(20)).unwrap();

        assert_eq!(term.index, 0);
        assert_eq!(term.numerator, BigInt::from(CHUDNOVSKY_A));
        // 640320^(3/2) = 512384047.99600074981...
        assert_eq!(term.denominator.to_string(), "512384047.99600074981");
        assert!(!term.is_negative());

        // 12 * term_0 is the one-term approximation of 1/pi
        let pi = BigDecimal::one()
            .div(&term.value.mul(&BigDecimal::from(12)), &ctx(14))
            .unwrap();
        assert!(pi.to_string().starts_with("3.14159265358"));
    }

    #[test]
    fn test_signs_alternate() {
        let cache = FactorialCache::cached();
        let evaluator = TermEvaluator::new(&cache);
        for k in 0..6 {
            let term = evaluator.evaluate_term(k, &ctx(25)).unwrap();
            assert_eq!(term.is_negative(), k % 2 == 1, "term {}", k);
            assert_eq!(term.numerator.sign() == Sign::Minus, k % 2 == 1);
        }
    }

    #[test]
    fn test_magnitude_strictly_decreases() {
        let cache = FactorialCache::cached();
        cache.prepopulate(TermEvaluator::max_factorial_argument(12).unwrap());
        let evaluator = TermEvaluator::new(&cache);

        let magnitudes: Vec<BigDecimal> = (0..=12)
            .map(|k| evaluator.evaluate_term(k, &ctx(30)).unwrap().value.abs())
            .collect();

        for pair in magnitudes.windows(2) {
            assert!(pair[1] < pair[0], "{} !< {}", pair[1], pair[0]);
        }
    }

    #[test]
    fn test_modes_produce_identical_terms() {
        let cached = FactorialCache::cached();
        let uncached = FactorialCache::uncached();
        for k in [0, 1, 7, 15] {
            let a = TermEvaluator::new(&cached).evaluate_term(k, &ctx(40)).unwrap();
            let b = TermEvaluator::new(&uncached).evaluate_term(k, &ctx(40)).unwrap();
            assert_eq!(a.value.to_string(), b.value.to_string());
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_max_factorial_argument() {
        assert_eq!(TermEvaluator::max_factorial_argument(0), Some(0));
        assert_eq!(TermEvaluator::max_factorial_argument(10), Some(60));
        assert_eq!(TermEvaluator::max_factorial_argument(u64::MAX / 6 + 1), None);
    }

    #[test]
    fn test_huge_index_rejected_before_factorials() {
        let cache = FactorialCache::uncached();
        let evaluator = TermEvaluator::new(&cache);
        for k in [i64::MAX, (u64::MAX / 6) as i64 + 1] {
            let err = evaluator.evaluate_term(k, &ctx(10)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ResourceExhaustion, "k={}", k);
        }
    }
}
