// ============================================================================
// Cancellation Token
// Cooperative cancellation shared between a caller and worker threads
// ============================================================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable flag used to stop an in-flight calculation.
///
/// Clones share the same flag. Workers poll it between tasks and the
/// reducer's join point polls it while waiting, so cancellation takes effect
/// after at most one term evaluation per worker.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
