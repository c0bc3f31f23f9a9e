// ============================================================================
// Parallel Reducer
// Fans term evaluation out to a bounded worker pool, folds results in order
// ============================================================================
//
// Workers pull term indices from a shared channel and send back
// (index, result) pairs in whatever order they finish. The caller thread is
// the only join point: it slots results by index, watches the cancellation
// token and deadline while it waits, and folds the slots in ascending index
// order once all of them are filled. The fold order never depends on
// completion order, so the digits are the same for any pool size.
// ============================================================================

use crate::domain::{CalculationId, PartialSum, Term};
use crate::engine::TermEvaluator;
use crate::errors::{CancelReason, PiError, PiResult};
use crate::interfaces::{CalculationEvent, EventHandler, FactorialSource, NoOpEventHandler};
use crate::numeric::PrecisionContext;
use crate::utils::{worker_count, CancellationToken};
use chrono::Utc;
use crossbeam::channel::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long the join point sleeps between cancellation checks
const JOIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

type TermResult = (u64, PiResult<Term>);

/// Evaluates terms `0..=term_count` in parallel and sums them in index order.
pub struct ParallelReducer {
    workers: Option<usize>,
    deadline: Option<Instant>,
    calculation_id: CalculationId,
    event_handler: Arc<dyn EventHandler>,
}

impl ParallelReducer {
    /// `workers = None` sizes the pool to the available cores.
    pub fn new(workers: Option<usize>) -> Self {
        Self {
            workers,
            deadline: None,
            calculation_id: CalculationId::new(),
            event_handler: Arc::new(NoOpEventHandler),
        }
    }

    /// Builder method: Fail with `Cancelled(TimedOut)` after this instant
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Builder method: Report progress for this calculation
    pub fn with_events(
        mut self,
        calculation_id: CalculationId,
        event_handler: Arc<dyn EventHandler>,
    ) -> Self {
        self.calculation_id = calculation_id;
        self.event_handler = event_handler;
        self
    }

    /// Sum terms `0..=term_count`, each rounded to `ctx`.
    ///
    /// `factorials` should already be prepared for `6 * term_count`; the
    /// parallel phase only reads from it.
    ///
    /// Cancellation and the deadline are checked between terms. A term that
    /// is already being evaluated finishes first, so after a cancel the
    /// call returns once each worker's current term is done.
    ///
    /// # Errors
    /// - `InvalidArgument` if `term_count` is negative
    /// - `Cancelled` if `cancel` fires or the deadline passes first
    /// - `ResourceExhaustion` if a worker cannot be spawned or panics
    /// - any error returned by term evaluation
    pub fn sum(
        &self,
        term_count: i64,
        ctx: &PrecisionContext,
        factorials: &dyn FactorialSource,
        cancel: &CancellationToken,
    ) -> PiResult<PartialSum> {
        if term_count < 0 {
            return Err(PiError::InvalidArgument {
                name: "term_count",
                value: term_count,
            });
        }

        let terms = self.evaluate_all(term_count as u64, ctx, factorials, cancel)?;

        let sum = terms
            .iter()
            .fold(PartialSum::new(), |sum, term| sum.accumulate(term, ctx));

        tracing::debug!(
            calculation_id = %self.calculation_id,
            terms = sum.terms(),
            "series reduced"
        );
        self.event_handler.on_event(CalculationEvent::SeriesReduced {
            calculation_id: self.calculation_id,
            terms: sum.terms(),
            timestamp: Utc::now(),
        });

        Ok(sum)
    }

    /// Evaluate every term on the pool; the returned vector is in index order.
    fn evaluate_all(
        &self,
        term_count: u64,
        ctx: &PrecisionContext,
        factorials: &dyn FactorialSource,
        cancel: &CancellationToken,
    ) -> PiResult<Vec<Term>> {
        let total = term_count as usize + 1;
        let workers = worker_count(self.workers, total);
        let evaluator = TermEvaluator::new(factorials);

        // Stops the pool on our own errors without touching the caller's token
        let halt = CancellationToken::new();

        let (task_tx, task_rx) = channel::unbounded::<u64>();
        for k in 0..=term_count {
            // Receiver is alive in this scope
            let _ = task_tx.send(k);
        }
        drop(task_tx);

        let (result_tx, result_rx) = channel::unbounded::<TermResult>();

        tracing::debug!(
            calculation_id = %self.calculation_id,
            total,
            workers,
            "dispatching term evaluation"
        );

        let outcome = crossbeam::thread::scope(|scope| {
            for id in 0..workers {
                let task_rx = task_rx.clone();
                let result_tx = result_tx.clone();
                let evaluator = &evaluator;
                let worker_cancel = cancel.clone();
                let worker_halt = halt.clone();

                let spawned = scope
                    .builder()
                    .name(format!("pi-term-{}", id))
                    .spawn(move |_| {
                        for k in task_rx.iter() {
                            if worker_cancel.is_cancelled() || worker_halt.is_cancelled() {
                                break;
                            }
                            let result = evaluator.evaluate_term(k as i64, ctx);
                            if result_tx.send((k, result)).is_err() {
                                break;
                            }
                        }
                    });

                if let Err(err) = spawned {
                    halt.cancel();
                    return Err(PiError::resource_exhaustion(format!(
                        "could not spawn worker {} of {}: {}",
                        id + 1,
                        workers,
                        err
                    )));
                }
            }
            drop(result_tx);

            let joined = self.join(&result_rx, total, cancel);
            if joined.is_err() {
                halt.cancel();
            }
            joined
        });

        match outcome {
            Ok(result) => result,
            Err(_) => Err(PiError::resource_exhaustion("term worker panicked")),
        }
    }

    /// The single synchronization point: wait for `total` results.
    fn join(
        &self,
        results: &Receiver<TermResult>,
        total: usize,
        cancel: &CancellationToken,
    ) -> PiResult<Vec<Term>> {
        let mut slots: Vec<Option<Term>> = (0..total).map(|_| None).collect();
        let mut completed = 0usize;

        while completed < total {
            if cancel.is_cancelled() {
                return Err(self.cancelled(CancelReason::Requested, completed, total));
            }
            if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Err(self.cancelled(CancelReason::TimedOut, completed, total));
            }

            match results.recv_timeout(JOIN_POLL_INTERVAL) {
                Ok((index, Ok(term))) => {
                    slots[index as usize] = Some(term);
                    completed += 1;
                    self.event_handler.on_event(CalculationEvent::TermEvaluated {
                        calculation_id: self.calculation_id,
                        index,
                        completed,
                        total,
                        timestamp: Utc::now(),
                    });
                },
                Ok((index, Err(err))) => {
                    tracing::warn!(
                        calculation_id = %self.calculation_id,
                        index,
                        error = %err,
                        "term evaluation failed"
                    );
                    return Err(err);
                },
                Err(RecvTimeoutError::Timeout) => {},
                Err(RecvTimeoutError::Disconnected) => {
                    // Workers stop early only when cancelled
                    if cancel.is_cancelled() {
                        return Err(self.cancelled(CancelReason::Requested, completed, total));
                    }
                    return Err(PiError::resource_exhaustion(format!(
                        "workers exited after {}/{} terms",
                        completed, total
                    )));
                },
            }
        }

        slots
            .into_iter()
            .map(|slot| {
                slot.ok_or_else(|| PiError::resource_exhaustion("term result missing after join"))
            })
            .collect()
    }

    fn cancelled(&self, reason: CancelReason, completed: usize, total: usize) -> PiError {
        tracing::info!(
            calculation_id = %self.calculation_id,
            %reason,
            completed,
            total,
            "term evaluation stopped"
        );
        PiError::Cancelled {
            reason,
            completed,
            total,
        }
    }
}
