//! Frontier queue of directories awaiting expansion
//!
//! A FIFO of owned absolute-path identifiers behind a single mutex. The
//! queue is unbounded: enqueue never fails and never blocks beyond the lock
//! hold. Dequeue on an empty queue is a normal negative result, not an
//! error.
//!
//! `is_empty()` is a snapshot and may be stale the instant it returns.
//! The termination decision therefore re-checks emptiness while holding
//! the coordinator's check lock (see the cycle module); the queue lock is
//! only ever taken transiently inside that critical section, never the
//! other way around.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for queue traffic
#[derive(Debug, Default)]
pub struct QueueStats {
    /// Total identifiers enqueued
    pub enqueued: AtomicU64,

    /// Total identifiers dequeued
    pub dequeued: AtomicU64,
}

impl QueueStats {
    /// Total identifiers enqueued so far
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    /// Total identifiers dequeued so far
    pub fn dequeued(&self) -> u64 {
        self.dequeued.load(Ordering::Relaxed)
    }
}

/// Thread-safe FIFO of pending directory identifiers
pub struct FrontierQueue {
    items: Mutex<VecDeque<String>>,
    stats: QueueStats,
}

impl FrontierQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            stats: QueueStats::default(),
        }
    }

    /// Append an identifier to the tail
    ///
    /// Takes ownership; once enqueued, the identifier is handed over whole
    /// to whichever worker dequeues it.
    pub fn enqueue(&self, id: String) {
        self.items.lock().push_back(id);
        self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    /// Remove and return the head, or `None` if the queue is empty
    pub fn dequeue(&self) -> Option<String> {
        let id = self.items.lock().pop_front();
        if id.is_some() {
            self.stats.dequeued.fetch_add(1, Ordering::Relaxed);
        }
        id
    }

    /// Snapshot emptiness check
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Snapshot length
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Queue traffic counters
    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }
}

impl Default for FrontierQueue {
    fn default() -> Self {
        Self::new()
    }
}
