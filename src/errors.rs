// ============================================================================
// Calculation Errors
// Crate-wide error type for pi calculation and its collaborators
// ============================================================================

use crate::numeric::NumericError;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Why a calculation stopped before producing a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CancelReason {
    /// The caller cancelled through a `CancellationToken`
    Requested,
    /// The configured deadline elapsed
    TimedOut,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Requested => write!(f, "cancellation requested"),
            CancelReason::TimedOut => write!(f, "deadline elapsed"),
        }
    }
}

/// Field-less discriminant of [`PiError`], convenient for matching and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    InvalidArgument,
    Cancelled,
    ResourceExhaustion,
    Numeric,
}

/// Errors surfaced by the calculator, the reducer and the term evaluator.
///
/// None of these are retried internally; retry policy belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PiError {
    /// Non-positive precision, invalid calculator configuration or bad CLI input
    Configuration { reason: String },

    /// Negative term index or term count
    InvalidArgument { name: &'static str, value: i64 },

    /// Interrupted before every term was evaluated; partial state was discarded
    Cancelled {
        reason: CancelReason,
        completed: usize,
        total: usize,
    },

    /// Limits exceeded, worker spawn failure or a worker panic
    ResourceExhaustion { reason: String },

    /// Arithmetic failure in the decimal layer
    Numeric(NumericError),
}

impl PiError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        PiError::Configuration {
            reason: reason.into(),
        }
    }

    pub fn resource_exhaustion(reason: impl Into<String>) -> Self {
        PiError::ResourceExhaustion {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PiError::Configuration { .. } => ErrorKind::Configuration,
            PiError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            PiError::Cancelled { .. } => ErrorKind::Cancelled,
            PiError::ResourceExhaustion { .. } => ErrorKind::ResourceExhaustion,
            PiError::Numeric(_) => ErrorKind::Numeric,
        }
    }
}

impl fmt::Display for PiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PiError::Configuration { reason } => write!(f, "configuration error: {}", reason),
            PiError::InvalidArgument { name, value } => write!(
                f,
                "invalid argument: {} must be non-negative, got {}",
                name, value
            ),
            PiError::Cancelled {
                reason,
                completed,
                total,
            } => write!(
                f,
                "calculation cancelled ({}) after {}/{} terms",
                reason, completed, total
            ),
            PiError::ResourceExhaustion { reason } => {
                write!(f, "resource exhaustion: {}", reason)
            },
            PiError::Numeric(err) => write!(f, "numeric error: {}", err),
        }
    }
}

impl std::error::Error for PiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PiError::Numeric(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NumericError> for PiError {
    fn from(err: NumericError) -> Self {
        PiError::Numeric(err)
    }
}

/// Result type alias for calculation operations
pub type PiResult<T> = Result<T, PiError>;
