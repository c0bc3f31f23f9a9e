// ============================================================================
// Arbitrary-Precision Decimal
// Exact decimal arithmetic with explicit, policy-driven rounding
// ============================================================================

use super::context::{Discarded, PrecisionContext, RoundingPolicy};
use super::errors::{NumericError, NumericResult};
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Arbitrary-precision decimal number.
///
/// Internally stores `unscaled × 10^-scale`. Addition, subtraction and
/// multiplication are exact; only [`round`](BigDecimal::round) and
/// [`div`](BigDecimal::div) shorten a value, and both do so under an
/// explicit [`PrecisionContext`].
///
/// # Example
/// ```
/// use pi_search::numeric::{BigDecimal, PrecisionContext, RoundingPolicy};
///
/// let ctx = PrecisionContext::new(10, RoundingPolicy::HalfEven).unwrap();
/// let third = BigDecimal::one().div(&BigDecimal::from(3), &ctx).unwrap();
/// assert_eq!(third.to_string(), "0.3333333333");
/// ```
#[derive(Clone)]
pub struct BigDecimal {
    unscaled: BigInt,
    scale: i64,
}

// ============================================================================
// Digit Helpers
// ============================================================================

/// 10^exp as an exact integer
pub(crate) fn pow10(exp: u64) -> BigUint {
    num_traits::pow(BigUint::from(10u8), exp as usize)
}

/// Number of decimal digits in `value` (zero has one digit).
pub(crate) fn digit_count(value: &BigUint) -> u64 {
    if value.is_zero() {
        return 1;
    }

    // 2^(bits-1) <= value < 2^bits, so the estimate is off by at most one
    let bits = value.bits();
    let mut digits = ((bits - 1) as f64 * std::f64::consts::LOG10_2) as u64 + 1;
    while digits > 1 && *value < pow10(digits - 1) {
        digits -= 1;
    }
    while *value >= pow10(digits) {
        digits += 1;
    }
    digits
}

impl BigDecimal {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Create from an unscaled integer and a scale: `unscaled × 10^-scale`.
    pub fn new(unscaled: BigInt, scale: i64) -> Self {
        Self { unscaled, scale }
    }

    pub fn zero() -> Self {
        Self::new(BigInt::zero(), 0)
    }

    pub fn one() -> Self {
        Self::new(BigInt::one(), 0)
    }

    fn from_sign_magnitude(negative: bool, magnitude: BigUint, scale: i64) -> Self {
        let sign = if negative { Sign::Minus } else { Sign::Plus };
        Self::new(BigInt::from_biguint(sign, magnitude), scale)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    #[inline]
    pub fn scale(&self) -> i64 {
        self.scale
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.unscaled.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.unscaled.sign() == Sign::Minus
    }

    /// Number of digits in the unscaled value.
    pub fn precision(&self) -> u64 {
        digit_count(self.unscaled.magnitude())
    }

    pub fn abs(&self) -> Self {
        Self::new(BigInt::from(self.unscaled.magnitude().clone()), self.scale)
    }

    // ========================================================================
    // Exact Arithmetic
    // ========================================================================

    /// Unscaled value expressed at a larger (or equal) scale.
    fn unscaled_at(&self, scale: i64) -> BigInt {
        debug_assert!(scale >= self.scale);
        let shift = (scale - self.scale) as u64;
        if shift == 0 {
            self.unscaled.clone()
        } else {
            &self.unscaled * BigInt::from(pow10(shift))
        }
    }

    /// Exact sum.
    pub fn add(&self, rhs: &Self) -> Self {
        let scale = self.scale.max(rhs.scale);
        Self::new(self.unscaled_at(scale) + rhs.unscaled_at(scale), scale)
    }

    /// Exact difference.
    pub fn sub(&self, rhs: &Self) -> Self {
        let scale = self.scale.max(rhs.scale);
        Self::new(self.unscaled_at(scale) - rhs.unscaled_at(scale), scale)
    }

    /// Exact product.
    pub fn mul(&self, rhs: &Self) -> Self {
        Self::new(&self.unscaled * &rhs.unscaled, self.scale + rhs.scale)
    }

    // ========================================================================
    // Rounded Arithmetic
    // ========================================================================

    /// Round to the context's significant digits.
    ///
    /// Values that already fit are returned unchanged.
    pub fn round(&self, ctx: &PrecisionContext) -> Self {
        Self::round_magnitude(
            self.is_negative(),
            self.unscaled.magnitude().clone(),
            self.scale,
            false,
            ctx,
        )
    }

    /// Quotient correctly rounded to the context.
    ///
    /// # Errors
    /// Returns `DivisionByZero` if `rhs` is zero.
    pub fn div(&self, rhs: &Self, ctx: &PrecisionContext) -> NumericResult<Self> {
        if rhs.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        if self.is_zero() {
            return Ok(Self::zero());
        }

        let negative = self.is_negative() != rhs.is_negative();
        let dividend = self.unscaled.magnitude();
        let divisor = rhs.unscaled.magnitude();

        // Shift the dividend so the integer quotient has at least one digit
        // beyond the target precision.
        let shift = (ctx.significant_digits() + 1 + digit_count(divisor))
            .saturating_sub(digit_count(dividend));
        let numerator = dividend * pow10(shift);
        let quotient = &numerator / divisor;
        let inexact = !(&numerator % divisor).is_zero();

        Ok(Self::round_magnitude(
            negative,
            quotient,
            self.scale - rhs.scale + shift as i64,
            inexact,
            ctx,
        ))
    }

    /// Round `magnitude × 10^-scale` to the context.
    ///
    /// `inexact` marks a nonzero tail below the last digit of `magnitude`
    /// (a division remainder or an inexact root). It breaks ties upward and
    /// makes directed policies treat an all-zero remainder as nonzero.
    pub(crate) fn round_magnitude(
        negative: bool,
        magnitude: BigUint,
        scale: i64,
        inexact: bool,
        ctx: &PrecisionContext,
    ) -> Self {
        if magnitude.is_zero() {
            return Self::zero();
        }

        let precision = ctx.significant_digits();
        let mut magnitude = magnitude;
        let mut scale = scale;
        let mut digits = digit_count(&magnitude);

        if inexact && digits <= precision {
            let pad = precision + 1 - digits;
            magnitude *= pow10(pad);
            scale += pad as i64;
            digits += pad;
        }

        if digits <= precision {
            return Self::from_sign_magnitude(negative, magnitude, scale);
        }

        let dropped = digits - precision;
        let divisor = pow10(dropped);
        let mut kept = &magnitude / &divisor;
        let remainder = &magnitude % &divisor;
        let half = pow10(dropped - 1) * 5u32;

        let discarded = if remainder.is_zero() && !inexact {
            Discarded::Zero
        } else {
            match remainder.cmp(&half) {
                Ordering::Less => Discarded::BelowHalf,
                Ordering::Equal if inexact => Discarded::AboveHalf,
                Ordering::Equal => Discarded::Half,
                Ordering::Greater => Discarded::AboveHalf,
            }
        };

        let odd = !(&kept % 2u32).is_zero();
        if ctx.rounding().increments(negative, odd, discarded) {
            kept += 1u32;
        }
        scale -= dropped as i64;

        // 99..9 rounded up gains a digit; the new last digit is a zero
        if digit_count(&kept) > precision {
            kept /= 10u32;
            scale -= 1;
        }

        Self::from_sign_magnitude(negative, kept, scale)
    }

    // ========================================================================
    // Conversion to rust_decimal (for API boundaries)
    // ========================================================================

    /// Convert to `rust_decimal::Decimal`, rounding to its 28 significant
    /// digits with ties to even.
    ///
    /// # Errors
    /// Returns `Overflow` if the value is outside `Decimal`'s range.
    pub fn to_decimal(&self) -> NumericResult<rust_decimal::Decimal> {
        let ctx = PrecisionContext::unchecked(28, RoundingPolicy::HalfEven);
        rust_decimal::Decimal::from_str(&self.round(&ctx).to_string())
            .map_err(|_| NumericError::Overflow)
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl Default for BigDecimal {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<BigInt> for BigDecimal {
    fn from(value: BigInt) -> Self {
        Self::new(value, 0)
    }
}

impl From<BigUint> for BigDecimal {
    fn from(value: BigUint) -> Self {
        Self::new(BigInt::from(value), 0)
    }
}

impl From<i64> for BigDecimal {
    fn from(value: i64) -> Self {
        Self::new(BigInt::from(value), 0)
    }
}

impl From<u64> for BigDecimal {
    fn from(value: u64) -> Self {
        Self::new(BigInt::from(value), 0)
    }
}

impl From<i32> for BigDecimal {
    fn from(value: i32) -> Self {
        Self::new(BigInt::from(value), 0)
    }
}

impl From<rust_decimal::Decimal> for BigDecimal {
    fn from(value: rust_decimal::Decimal) -> Self {
        Self::new(BigInt::from(value.mantissa()), value.scale() as i64)
    }
}

impl PartialEq for BigDecimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BigDecimal {}

impl PartialOrd for BigDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let scale = self.scale.max(other.scale);
        self.unscaled_at(scale).cmp(&other.unscaled_at(scale))
    }
}

impl std::ops::Neg for BigDecimal {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.unscaled, self.scale)
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl fmt::Display for BigDecimal {
    /// Plain notation, never scientific: `3.14`, `-0.001`, `1200`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.unscaled.magnitude().to_string();
        let sign = if self.is_negative() { "-" } else { "" };

        if self.is_zero() && self.scale <= 0 {
            return write!(f, "0");
        }

        if self.scale <= 0 {
            let zeros = "0".repeat(self.scale.unsigned_abs() as usize);
            return write!(f, "{}{}{}", sign, digits, zeros);
        }

        let scale = self.scale as usize;
        if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            write!(f, "{}{}.{}", sign, int_part, frac_part)
        } else {
            let zeros = "0".repeat(scale - digits.len());
            write!(f, "{}0.{}{}", sign, zeros, digits)
        }
    }
}

impl fmt::Debug for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BigDecimal({}, unscaled={}, scale={})",
            self, self.unscaled, self.scale
        )
    }
}

// ============================================================================
// String Parsing
// ============================================================================

impl FromStr for BigDecimal {
    type Err = NumericError;

    /// Parse a plain decimal literal.
    ///
    /// # Examples
    /// - "123" -> 123
    /// - "123.456" -> 123.456
    /// - "-0.001" -> -0.001
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, s) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (int_str, frac_str) = match s.find('.') {
            Some(pos) => (&s[..pos], &s[pos + 1..]),
            None => (s, ""),
        };

        if int_str.is_empty() && frac_str.is_empty() {
            return Err(NumericError::InvalidInput);
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_str) || !all_digits(frac_str) {
            return Err(NumericError::InvalidInput);
        }

        let combined = format!("{}{}", int_str, frac_str);
        let magnitude =
            BigUint::parse_bytes(combined.as_bytes(), 10).ok_or(NumericError::InvalidInput)?;

        Ok(Self::from_sign_magnitude(
            negative,
            magnitude,
            frac_str.len() as i64,
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================
