// ============================================================================
// Worker Pool Sizing
// Pool size tracks hardware concurrency for CPU-bound term evaluation
// ============================================================================
//
// Defaults to one worker per available core, never more workers than tasks.
// ============================================================================

/// Number of CPUs the process may run on (at least 1).
pub fn get_available_cores() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1)
}

/// Resolve the worker count for `tasks` independent tasks.
///
/// `requested` overrides hardware detection; zero is treated as one.
pub fn worker_count(requested: Option<usize>, tasks: usize) -> usize {
    let workers = requested.unwrap_or_else(get_available_cores).max(1);
    workers.min(tasks.max(1))
}
