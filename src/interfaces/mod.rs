// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod event_handler;
mod factorial_source;

pub use event_handler::{CalculationEvent, EventHandler, LoggingEventHandler, NoOpEventHandler};
pub use factorial_source::FactorialSource;
