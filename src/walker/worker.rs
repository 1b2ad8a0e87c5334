//! Worker thread driver
//!
//! A worker is a thin loop binding the frontier queue, the node expander,
//! and the cycle coordinator: park on the sleep latch, attempt one
//! expansion, report the outcome, repeat until the done flag is observed.
//! Everything interesting happens in the collaborators; the worker itself
//! only owns its statistics and its thread handle.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

use crate::error::WorkerError;
use crate::report::EventSender;
use crate::walker::cycle::CycleCoordinator;
use crate::walker::expand::NodeExpander;
use crate::walker::queue::FrontierQueue;

/// Statistics collected by a worker
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Directories expanded
    pub dirs_expanded: AtomicU64,

    /// Subdirectories enqueued
    pub subdirs_enqueued: AtomicU64,

    /// Files that matched the pattern
    pub leaves_matched: AtomicU64,

    /// Files that did not match
    pub leaves_unmatched: AtomicU64,

    /// Children skipped by exclusion patterns
    pub excluded: AtomicU64,
}

impl WorkerStats {
    pub(crate) fn record_dir(&self) {
        self.dirs_expanded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_enqueue(&self) {
        self.subdirs_enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_match(&self) {
        self.leaves_matched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_non_match(&self) {
        self.leaves_unmatched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_excluded(&self) {
        self.excluded.fetch_add(1, Ordering::Relaxed);
    }
}

/// A worker thread participating in the walk
pub struct Worker {
    /// Worker ID (slot in the coordinator's status array)
    id: usize,

    /// Thread handle
    handle: Option<JoinHandle<()>>,

    /// Worker statistics
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Spawn a new worker thread
    ///
    /// Spawn failure is fatal: it means the pool the termination protocol
    /// was sized for cannot be provided.
    pub fn spawn(
        id: usize,
        expander: Arc<NodeExpander>,
        queue: Arc<FrontierQueue>,
        cycle: Arc<CycleCoordinator>,
        events: EventSender,
    ) -> Result<Self, WorkerError> {
        let stats = Arc::new(WorkerStats::default());
        let stats_clone = Arc::clone(&stats);

        let handle = thread::Builder::new()
            .name(format!("walker-{}", id))
            .spawn(move || worker_loop(id, expander, queue, cycle, events, stats_clone))
            .map_err(|e| WorkerError::InitFailed {
                id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
            stats,
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Get worker statistics
    pub fn stats(&self) -> &WorkerStats {
        &self.stats
    }

    /// Get a shared handle to the statistics, readable after join
    pub fn stats_handle(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    /// Wait for the worker to finish
    pub fn join(mut self) -> Result<(), WorkerError> {
        if let Some(handle) = self.handle.take() {
            handle.join().map_err(|_| WorkerError::Panicked { id: self.id })
        } else {
            Ok(())
        }
    }
}

/// Main worker loop: one expansion attempt per cycle until done
fn worker_loop(
    id: usize,
    expander: Arc<NodeExpander>,
    queue: Arc<FrontierQueue>,
    cycle: Arc<CycleCoordinator>,
    events: EventSender,
    stats: Arc<WorkerStats>,
) {
    debug!(worker = id, "Worker starting");

    while !cycle.is_done() {
        // Suspension point: blocks between cycles until woken by whichever
        // worker runs the decision logic
        cycle.park(id);

        let did_work = match queue.dequeue() {
            Some(path) => expander.expand(id, &path, &queue, &events, &stats),
            // Empty queue is not an error; stand by for the next cycle
            None => false,
        };

        cycle.report(id, did_work, &queue);
    }

    info!(
        worker = id,
        dirs = stats.dirs_expanded.load(Ordering::Relaxed),
        matched = stats.leaves_matched.load(Ordering::Relaxed),
        "Worker finished"
    );
}

/// Aggregate statistics from all workers
///
/// Returns (dirs expanded, subdirs enqueued, matched, unmatched, excluded).
pub fn aggregate_stats(stats: &[Arc<WorkerStats>]) -> (u64, u64, u64, u64, u64) {
    let mut dirs = 0u64;
    let mut enqueued = 0u64;
    let mut matched = 0u64;
    let mut unmatched = 0u64;
    let mut excluded = 0u64;

    for s in stats {
        dirs += s.dirs_expanded.load(Ordering::Relaxed);
        enqueued += s.subdirs_enqueued.load(Ordering::Relaxed);
        matched += s.leaves_matched.load(Ordering::Relaxed);
        unmatched += s.leaves_unmatched.load(Ordering::Relaxed);
        excluded += s.excluded.load(Ordering::Relaxed);
    }

    (dirs, enqueued, matched, unmatched, excluded)
}
