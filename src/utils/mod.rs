// ============================================================================
// Utilities Module
// Worker pool sizing and cooperative cancellation
// ============================================================================

mod cancellation;
mod parallelism;

pub use cancellation::CancellationToken;
pub use parallelism::{get_available_cores, worker_count};
