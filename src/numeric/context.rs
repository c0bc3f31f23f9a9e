// ============================================================================
// Precision Context
// Significant-digit target and rounding policy shared by one calculation
// ============================================================================

use crate::errors::{PiError, PiResult};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the last kept digit is chosen when a value is shortened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoundingPolicy {
    /// Away from zero whenever anything is discarded
    Up,
    /// Toward zero (truncation)
    Down,
    /// Toward positive infinity
    Ceiling,
    /// Toward negative infinity
    Floor,
    /// Nearest neighbour, ties away from zero
    HalfUp,
    /// Nearest neighbour, ties toward zero
    HalfDown,
    /// Nearest neighbour, ties to the even neighbour (banker's rounding)
    #[default]
    HalfEven,
}

/// Position of the discarded digits relative to half a unit in the last place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Discarded {
    Zero,
    BelowHalf,
    Half,
    AboveHalf,
}

impl RoundingPolicy {
    /// Whether the truncated magnitude must be incremented by one unit.
    pub(crate) fn increments(self, negative: bool, odd: bool, discarded: Discarded) -> bool {
        if discarded == Discarded::Zero {
            return false;
        }
        match self {
            RoundingPolicy::Up => true,
            RoundingPolicy::Down => false,
            RoundingPolicy::Ceiling => !negative,
            RoundingPolicy::Floor => negative,
            RoundingPolicy::HalfUp => discarded != Discarded::BelowHalf,
            RoundingPolicy::HalfDown => discarded == Discarded::AboveHalf,
            RoundingPolicy::HalfEven => match discarded {
                Discarded::AboveHalf => true,
                Discarded::Half => odd,
                _ => false,
            },
        }
    }
}

impl fmt::Display for RoundingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundingPolicy::Up => "up",
            RoundingPolicy::Down => "down",
            RoundingPolicy::Ceiling => "ceiling",
            RoundingPolicy::Floor => "floor",
            RoundingPolicy::HalfUp => "half-up",
            RoundingPolicy::HalfDown => "half-down",
            RoundingPolicy::HalfEven => "half-even",
        };
        f.write_str(name)
    }
}

impl FromStr for RoundingPolicy {
    type Err = PiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "up" => Ok(RoundingPolicy::Up),
            "down" => Ok(RoundingPolicy::Down),
            "ceiling" => Ok(RoundingPolicy::Ceiling),
            "floor" => Ok(RoundingPolicy::Floor),
            "half-up" => Ok(RoundingPolicy::HalfUp),
            "half-down" => Ok(RoundingPolicy::HalfDown),
            "half-even" => Ok(RoundingPolicy::HalfEven),
            other => Err(PiError::configuration(format!(
                "unknown rounding policy '{}'",
                other
            ))),
        }
    }
}

/// Immutable precision settings for one calculation.
///
/// Every rounded operation in the engine rounds to `significant_digits`
/// digits using `rounding`. The context is `Copy` and shared read-only by
/// all worker threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrecisionContext {
    significant_digits: u64,
    rounding: RoundingPolicy,
}

impl PrecisionContext {
    /// Create a context.
    ///
    /// # Errors
    /// Returns `Configuration` if `significant_digits` is zero or negative.
    pub fn new(significant_digits: i64, rounding: RoundingPolicy) -> PiResult<Self> {
        if significant_digits <= 0 {
            return Err(PiError::configuration(format!(
                "significant digits must be positive, got {}",
                significant_digits
            )));
        }
        Ok(Self {
            significant_digits: significant_digits as u64,
            rounding,
        })
    }

    /// Internal constructor for contexts whose digit count is known to be
    /// positive.
    pub(crate) const fn unchecked(significant_digits: u64, rounding: RoundingPolicy) -> Self {
        Self {
            significant_digits,
            rounding,
        }
    }

    /// 34 significant digits, ties to even (IEEE 754 decimal128).
    pub fn decimal128() -> Self {
        Self {
            significant_digits: 34,
            rounding: RoundingPolicy::HalfEven,
        }
    }

    #[inline]
    pub fn significant_digits(&self) -> u64 {
        self.significant_digits
    }

    #[inline]
    pub fn rounding(&self) -> RoundingPolicy {
        self.rounding
    }

    /// A wider context with the same rounding policy, used as working
    /// precision for intermediate results.
    pub fn with_extra_digits(&self, extra: u64) -> Self {
        Self {
            significant_digits: self.significant_digits.saturating_add(extra),
            rounding: self.rounding,
        }
    }
}

impl fmt::Display for PrecisionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "precision={} rounding={}",
            self.significant_digits, self.rounding
        )
    }
}
