// ============================================================================
// Series Term and Partial Sum
// ============================================================================

use crate::numeric::{BigDecimal, PrecisionContext};
use num_bigint::BigInt;

/// The k-th Chudnovsky term, `numerator / denominator`.
///
/// Produced by one worker, handed to the reducer, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// Index k in the series
    pub index: u64,

    /// Exact signed numerator: (-1)^k (6k)! (13591409 + 545140134k)
    pub numerator: BigInt,

    /// (3k)! (k!)^3 640320^(3k + 3/2), rounded to the working precision
    pub denominator: BigDecimal,

    /// numerator / denominator, rounded to the working precision
    pub value: BigDecimal,
}

impl Term {
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.value.is_negative()
    }
}

/// Running sum of terms folded in ascending index order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartialSum {
    value: BigDecimal,
    terms: usize,
}

impl PartialSum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one term and round to `ctx`.
    ///
    /// Rounded addition is not associative, so callers must fold terms in a
    /// fixed order to get reproducible digits.
    pub fn accumulate(self, term: &Term, ctx: &PrecisionContext) -> Self {
        Self {
            value: self.value.add(&term.value).round(ctx),
            terms: self.terms + 1,
        }
    }

    #[inline]
    pub fn value(&self) -> &BigDecimal {
        &self.value
    }

    /// Number of terms folded so far
    #[inline]
    pub fn terms(&self) -> usize {
        self.terms
    }

    pub fn into_value(self) -> BigDecimal {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::RoundingPolicy;

    fn term(index: u64, value: &str) -> Term {
        Term {
            index,
            numerator: BigInt::from(1),
            denominator: BigDecimal::one(),
            value: value.parse().unwrap(),
        }
    }

    #[test]
    fn test_accumulate_counts_and_rounds() {
        let ctx = PrecisionContext::new(3, RoundingPolicy::HalfEven).unwrap();
        let sum = PartialSum::new()
            .accumulate(&term(0, "1.234"), &ctx)
            .accumulate(&term(1, "-0.0001"), &ctx);

        assert_eq!(sum.terms(), 2);
        assert_eq!(sum.value().to_string(), "1.23");
    }

    #[test]
    fn test_fold_order_matters_at_fixed_precision() {
        let ctx = PrecisionContext::new(2, RoundingPolicy::HalfEven).unwrap();
        let a = term(0, "1.0");
        let b = term(1, "0.04");
        let c = term(2, "0.04");

        let forward = PartialSum::new()
            .accumulate(&a, &ctx)
            .accumulate(&b, &ctx)
            .accumulate(&c, &ctx);
        let backward = PartialSum::new()
            .accumulate(&c, &ctx)
            .accumulate(&b, &ctx)
            .accumulate(&a, &ctx);

        // 1.0 + 0.04 -> 1.0 twice, versus 0.08 + 1.0 -> 1.1
        assert_eq!(forward.value().to_string(), "1.0");
        assert_eq!(backward.value().to_string(), "1.1");
    }
}
