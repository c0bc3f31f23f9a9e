// ============================================================================
// Domain Models Module
// Configuration, identities and series values
// ============================================================================

pub mod calculation;
pub mod config;
pub mod term;

pub use calculation::CalculationId;
pub use config::CalculatorConfig;
pub use term::{PartialSum, Term};
