// ============================================================================
// Numeric Module
// Arbitrary-precision decimal arithmetic for series evaluation
// ============================================================================
//
// This module provides:
// - BigDecimal: exact decimal over num-bigint with explicit rounding
// - PrecisionContext / RoundingPolicy: significant-digit target and tie rule
// - pow_ratio: correctly rounded rational powers of integers
// - NumericError: error types for arithmetic operations
//
// Design principles:
// - No floating-point operations on values
// - add/sub/mul are exact; only round, div and pow_ratio shorten a value
// - Rounding always receives the full discarded tail (no double rounding)

mod big_decimal;
mod context;
mod errors;
mod power;

pub use big_decimal::BigDecimal;
pub use context::{PrecisionContext, RoundingPolicy};
pub use errors::{NumericError, NumericResult};
pub use power::pow_ratio;
