// ============================================================================
// Engine Module
// Factorials, term evaluation, parallel summation and the calculator facade
// ============================================================================

mod calculator;
mod factorial;
mod reducer;
mod term_evaluator;

pub mod factory;

pub use calculator::PiCalculator;
pub use factorial::{FactorialCache, FactorialMode};
pub use factory::{create_from_config, PiCalculatorBuilder};
pub use reducer::ParallelReducer;
pub use term_evaluator::{TermEvaluator, CHUDNOVSKY_A, CHUDNOVSKY_B, CHUDNOVSKY_C};
