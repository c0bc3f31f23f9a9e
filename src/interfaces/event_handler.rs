// ============================================================================
// Event Handler Interface
// Defines the contract for observing calculation progress
// ============================================================================

use crate::domain::CalculationId;
use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted while a calculation runs
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CalculationEvent {
    /// Calculation accepted and validated
    CalculationStarted {
        calculation_id: CalculationId,
        term_count: u64,
        significant_digits: u64,
        workers: usize,
        timestamp: DateTime<Utc>,
    },

    /// Factorial source ready for the parallel phase
    FactorialsPrepared {
        calculation_id: CalculationId,
        max_argument: u64,
        memoized: bool,
        timestamp: DateTime<Utc>,
    },

    /// One term finished (completion order, not index order)
    TermEvaluated {
        calculation_id: CalculationId,
        index: u64,
        completed: usize,
        total: usize,
        timestamp: DateTime<Utc>,
    },

    /// All terms folded in index order
    SeriesReduced {
        calculation_id: CalculationId,
        terms: usize,
        timestamp: DateTime<Utc>,
    },

    /// Final value produced
    CalculationCompleted {
        calculation_id: CalculationId,
        elapsed_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// Calculation failed or was cancelled; no value produced
    CalculationFailed {
        calculation_id: CalculationId,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

/// Event handler trait for processing calculation events
/// Implementations can handle logging, progress bars, metrics, etc.
pub trait EventHandler: Send + Sync {
    /// Handle a calculation event
    fn on_event(&self, event: CalculationEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<CalculationEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: CalculationEvent) {
        // Do nothing
    }
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: CalculationEvent) {
        match &event {
            CalculationEvent::TermEvaluated { .. } => {
                tracing::trace!("Pi calculation event: {:?}", event)
            },
            CalculationEvent::CalculationFailed { .. } => {
                tracing::warn!("Pi calculation event: {:?}", event)
            },
            _ => tracing::debug!("Pi calculation event: {:?}", event),
        }
    }
}
