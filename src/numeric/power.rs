// ============================================================================
// Rational Powers
// Correctly rounded B^(n/d) for a positive integer base
// ============================================================================

use super::big_decimal::{digit_count, pow10, BigDecimal};
use super::context::PrecisionContext;
use super::errors::{NumericError, NumericResult};
use num_bigint::BigUint;
use num_rational::Ratio;
use num_traits::Zero;

/// `base^exponent` rounded to the context's significant digits.
///
/// The value is evaluated as the d-th integer root of `base^n × 10^(d·s)`,
/// where `exponent = n/d` in lowest terms and `s` is chosen so the root
/// carries at least one digit beyond the target precision. Whether the root
/// was exact is passed to rounding, so the result is correctly rounded under
/// every policy and never rounded twice.
///
/// # Errors
/// Returns `InvalidInput` if the exponent's numerator or denominator does
/// not fit in a `u32`.
///
/// # Example
/// ```
/// use num_bigint::BigUint;
/// use num_rational::Ratio;
/// use pi_search::numeric::{pow_ratio, PrecisionContext, RoundingPolicy};
///
/// let ctx = PrecisionContext::new(20, RoundingPolicy::HalfEven).unwrap();
/// let root_two = pow_ratio(&BigUint::from(2u32), &Ratio::new(1, 2), &ctx).unwrap();
/// assert_eq!(root_two.to_string(), "1.4142135623730950488");
/// ```
pub fn pow_ratio(
    base: &BigUint,
    exponent: &Ratio<u64>,
    ctx: &PrecisionContext,
) -> NumericResult<BigDecimal> {
    let numer = u32::try_from(*exponent.numer()).map_err(|_| NumericError::InvalidInput)?;
    let denom = u32::try_from(*exponent.denom()).map_err(|_| NumericError::InvalidInput)?;

    if base.is_zero() {
        return Ok(if numer == 0 {
            BigDecimal::one()
        } else {
            BigDecimal::zero()
        });
    }

    let power = base.pow(numer);
    if denom == 1 {
        return Ok(BigDecimal::from(power).round(ctx));
    }

    // A d-th root of a D-digit integer has at least (D-1)/d + 1 digits
    let integral_digits = (digit_count(&power) - 1) / denom as u64 + 1;
    let fraction_digits = (ctx.significant_digits() + 1).saturating_sub(integral_digits);

    let radicand = power * pow10(fraction_digits * denom as u64);
    let root = radicand.nth_root(denom);
    let exact = root.pow(denom) == radicand;

    Ok(BigDecimal::round_magnitude(
        false,
        root,
        fraction_digits as i64,
        !exact,
        ctx,
    ))
}
