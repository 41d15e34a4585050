//! Background execution of mutating fleet operations.
//!
//! The runner is a single-slot job channel: at most one mutating operation
//! is in flight system-wide, and the slot itself is the busy flag. `submit`
//! refuses new work while the slot is occupied (no queueing, no
//! coalescing), so the at-most-one invariant is structural rather than
//! flag-checked.
//!
//! Every accepted job, whatever its outcome, finishes by re-polling the
//! status provider exactly once; the fresh snapshot rides back on the
//! result channel so optimistic UI state is always corrected. A job that
//! panics drops its sender, which the main loop observes as a disconnected
//! channel and recovers from with an inline poll.

use std::future::Future;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;

use shardman_core::{CommandOutput, Result, Shard, ShardmanError};
use shardman_supervisor::StatusProvider;
use tracing::{debug, info, warn};

/// Result of one completed background job.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    /// Human-readable description ("restart Master", "stop all shards").
    pub label: String,
    /// Whether every underlying action succeeded.
    pub success: bool,
    /// Failure detail (first stderr line per failed shard), empty on success.
    pub detail: String,
    /// Fresh status snapshot taken after the job finished.
    pub snapshot: Vec<Shard>,
}

/// What the main loop sees when it polls the runner.
#[derive(Debug)]
pub enum JobPoll {
    /// No job in flight.
    Idle,
    /// A job is still running.
    Pending,
    /// A job finished; the slot is now free.
    Completed(JobOutcome),
    /// The job vanished without reporting (panicked task). The slot is
    /// free, but the caller must refresh the snapshot itself.
    Aborted,
}

/// Executes mutating operations off the interactive thread.
pub struct JobRunner {
    runtime: tokio::runtime::Runtime,
    provider: Arc<StatusProvider>,
    slot: Option<Receiver<JobOutcome>>,
}

impl JobRunner {
    /// Create a runner around its own tokio runtime.
    pub fn new(provider: Arc<StatusProvider>) -> Result<Self> {
        let runtime = tokio::runtime::Runtime::new().map_err(|e| {
            ShardmanError::internal(format!("failed to start the job runtime: {e}"))
        })?;
        Ok(Self {
            runtime,
            provider,
            slot: None,
        })
    }

    /// Whether a job is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.slot.is_some()
    }

    /// Run a future to completion on the runner's runtime.
    ///
    /// Used by the main loop for its own (short) supervisor reads:
    /// reconciliation polls, log fetches, and the inline updater run.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Submit a mutating operation.
    ///
    /// Returns `false` immediately, performing no work and mutating no
    /// state, if a job is already in flight. On acceptance the operation
    /// runs on the background runtime; completion (success or failure)
    /// always triggers exactly one status poll before the outcome is
    /// delivered.
    pub fn submit<F>(&mut self, label: impl Into<String>, operation: F) -> bool
    where
        F: Future<Output = Vec<(String, CommandOutput)>> + Send + 'static,
    {
        if self.slot.is_some() {
            debug!("job rejected: another job is in flight");
            return false;
        }

        let label = label.into();
        info!(job = %label, "job accepted");

        let provider = Arc::clone(&self.provider);
        let (tx, rx) = mpsc::channel();
        let task_label = label.clone();
        self.runtime.spawn(async move {
            let results = operation.await;
            // Unconditional resync, regardless of the operation's outcome.
            let snapshot = provider.poll().await;

            let failures: Vec<String> = results
                .iter()
                .filter(|(_, output)| !output.success)
                .map(|(name, output)| format!("{name}: {}", output.summary()))
                .collect();
            let outcome = JobOutcome {
                success: failures.is_empty(),
                detail: failures.join("; "),
                label: task_label,
                snapshot,
            };
            // The receiver may be gone if the app quit mid-job.
            let _ = tx.send(outcome);
        });

        self.slot = Some(rx);
        true
    }

    /// Poll for job completion without blocking.
    pub fn poll(&mut self) -> JobPoll {
        let Some(rx) = &self.slot else {
            return JobPoll::Idle;
        };
        match rx.try_recv() {
            Ok(outcome) => {
                self.slot = None;
                info!(job = %outcome.label, success = outcome.success, "job finished");
                JobPoll::Completed(outcome)
            }
            Err(TryRecvError::Empty) => JobPoll::Pending,
            Err(TryRecvError::Disconnected) => {
                self.slot = None;
                warn!("background job disappeared without reporting");
                JobPoll::Aborted
            }
        }
    }
}
