//! Cycle-based termination detection
//!
//! Workers cannot individually decide that the walk is over: one worker's
//! "queue looks empty" observation races with another worker about to
//! enqueue freshly discovered subdirectories. Counting idle workers with
//! bare increments loses updates, and polling the queue burns CPU. Instead,
//! the walk proceeds in cycles: every worker attempts exactly one expansion
//! per cycle, reports how it went, and sleeps on its own latch until the
//! next cycle opens.
//!
//! Per cycle, each worker's status moves from [`WorkerStatus::Ready`] to
//! either [`WorkerStatus::Idle`] (ran, enqueued nothing) or
//! [`WorkerStatus::DidWork`] (ran, enqueued at least one directory). A
//! worker writes only its own status; every status write and every latch
//! release happens inside one critical section (the check lock), so the
//! decision scan always sees a consistent snapshot:
//!
//! - a worker that enqueued work while the queue is non-empty wakes every
//!   idle worker, giving them another chance before anyone concludes
//!   quiescence;
//! - once every worker has run this cycle, a new cycle begins (wake all);
//! - once every worker ended the cycle idle and the queue is empty under
//!   the same lock, nobody can ever produce work again: the done flag is
//!   set exactly once and every latch is released so workers can exit.
//!
//! Lock order: check lock outermost, queue lock taken transiently inside
//! it, never reversed, and never held across a suspension point.

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace};

use crate::walker::queue::FrontierQueue;

/// Per-worker status with respect to the current cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerStatus {
    /// Has not yet run in the current cycle
    Ready,
    /// Ran this cycle without enqueueing anything
    Idle,
    /// Ran this cycle and enqueued at least one directory
    DidWork,
}

/// Binary gate suspending one worker between cycles
///
/// The owning worker acquires (consumes the permit, blocking until one is
/// available); only the check-lock critical section releases it. Release is
/// idempotent: the permit is a flag, not a counter.
struct Latch {
    permit: Mutex<bool>,
    condvar: Condvar,
}

impl Latch {
    fn open() -> Self {
        Self {
            permit: Mutex::new(true),
            condvar: Condvar::new(),
        }
    }

    /// Block until a permit is available, then consume it
    fn acquire(&self) {
        let mut permit = self.permit.lock();
        while !*permit {
            self.condvar.wait(&mut permit);
        }
        *permit = false;
    }

    /// Grant a permit, waking the owner if it is parked
    fn release(&self) {
        let mut permit = self.permit.lock();
        *permit = true;
        self.condvar.notify_one();
    }
}

/// Which workers a wake pass should release
#[derive(Clone, Copy, PartialEq, Eq)]
enum WakeSet {
    /// Only workers that ended the cycle idle
    IdleOnly,
    /// Every worker that has run this cycle
    Everyone,
}

/// Shared state machine deciding when the walk is over
pub struct CycleCoordinator {
    /// Check lock: guards the status array and serializes the decision
    statuses: Mutex<Vec<WorkerStatus>>,

    /// One sleep latch per worker, all initially open so the first cycle
    /// can start
    latches: Vec<Latch>,

    /// Write-once global done flag
    done: AtomicBool,
}

impl CycleCoordinator {
    /// Create coordination state for `worker_count` workers
    pub fn new(worker_count: usize) -> Self {
        Self {
            statuses: Mutex::new(vec![WorkerStatus::Ready; worker_count]),
            latches: (0..worker_count).map(|_| Latch::open()).collect(),
            done: AtomicBool::new(false),
        }
    }

    /// Number of coordinated workers
    pub fn worker_count(&self) -> usize {
        self.latches.len()
    }

    /// Has the walk been declared over?
    ///
    /// Monotonic: once true, never reset.
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Suspension point: block until this worker's latch is released
    ///
    /// This is the only place a worker blocks. A worker never releases its
    /// own latch; it is woken by whichever worker runs the decision logic.
    pub fn park(&self, worker_id: usize) {
        self.latches[worker_id].acquire();
    }

    /// Report the outcome of one expansion attempt and run the
    /// termination check
    ///
    /// `did_work` is whether the worker enqueued at least one directory
    /// this cycle. The entire decision runs under the check lock, so no two
    /// workers can concurrently open a new cycle or declare done.
    pub fn report(&self, worker_id: usize, did_work: bool, queue: &FrontierQueue) {
        let mut statuses = self.statuses.lock();

        // Own status only; no other thread ever writes this slot
        statuses[worker_id] = if did_work {
            WorkerStatus::DidWork
        } else {
            WorkerStatus::Idle
        };

        if self.is_done() {
            // A late report after the done decision changes nothing
            return;
        }

        // New work appeared: idle workers must get another chance before
        // anyone concludes quiescence. The queue check happens under the
        // check lock, closing the "looked empty while someone was about to
        // enqueue" race.
        if did_work && !queue.is_empty() {
            self.wake(&mut statuses, WakeSet::IdleOnly);
        }

        let all_ran = statuses.iter().all(|s| *s != WorkerStatus::Ready);
        let all_idle = statuses.iter().all(|s| *s == WorkerStatus::Idle);

        // Every worker has run: open the next cycle
        if all_ran {
            trace!(worker = worker_id, "Cycle complete, starting next");
            self.wake(&mut statuses, WakeSet::Everyone);
        }

        // Every worker ended the cycle idle and the frontier is empty:
        // nobody will ever enqueue again
        if all_idle && queue.is_empty() {
            debug!(worker = worker_id, "Quiescence detected, walk done");
            self.done.store(true, Ordering::Release);
            for latch in &self.latches {
                latch.release();
            }
        }
    }

    /// Reset the selected workers to ready and release their latches
    fn wake(&self, statuses: &mut [WorkerStatus], set: WakeSet) {
        for (id, status) in statuses.iter_mut().enumerate() {
            if *status == WorkerStatus::Ready {
                continue;
            }
            if set == WakeSet::IdleOnly && *status != WorkerStatus::Idle {
                continue;
            }
            *status = WorkerStatus::Ready;
            self.latches[id].release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(coord: &CycleCoordinator, id: usize) -> WorkerStatus {
        coord.statuses.lock()[id]
    }

    #[test]
    fn test_single_worker_declares_done_on_empty_queue() {
        let coord = CycleCoordinator::new(1);
        let queue = FrontierQueue::new();

        coord.park(0);
        coord.report(0, false, &queue);

        assert!(coord.is_done());
        // Latch was released for exit: park must not block
        coord.park(0);
    }

    #[test]
    fn test_single_worker_runs_until_queue_drained() {
        let coord = CycleCoordinator::new(1);
        let queue = FrontierQueue::new();
        queue.enqueue("/a".into());
        queue.enqueue("/b".into());

        // Two productive cycles: dequeue, pretend we enqueued nothing new
        for _ in 0..2 {
            coord.park(0);
            queue.dequeue();
            coord.report(0, true, &queue);
            assert!(!coord.is_done());
        }

        // Final idle cycle over the now-empty queue
        coord.park(0);
        coord.report(0, false, &queue);
        assert!(coord.is_done());
    }

    #[test]
    fn test_enqueue_wakes_idle_workers() {
        let coord = CycleCoordinator::new(2);
        let queue = FrontierQueue::new();

        // Worker 0 finds nothing and goes idle
        coord.park(0);
        coord.report(0, false, &queue);
        assert_eq!(status_of(&coord, 0), WorkerStatus::Idle);
        assert!(!coord.is_done());

        // Worker 1 enqueues: worker 0 must be reset to ready and released
        coord.park(1);
        queue.enqueue("/found".into());
        coord.report(1, true, &queue);
        assert_eq!(status_of(&coord, 0), WorkerStatus::Ready);
        assert!(!coord.is_done());

        // Worker 0 can run again without blocking
        coord.park(0);
        assert_eq!(queue.dequeue().as_deref(), Some("/found"));
        coord.report(0, true, &queue);

        // Both did work: a fresh cycle opened for everyone
        assert_eq!(status_of(&coord, 0), WorkerStatus::Ready);
        assert_eq!(status_of(&coord, 1), WorkerStatus::Ready);
    }

    #[test]
    fn test_done_requires_empty_queue() {
        let coord = CycleCoordinator::new(2);
        let queue = FrontierQueue::new();
        queue.enqueue("/pending".into());

        coord.park(0);
        coord.report(0, false, &queue);
        coord.park(1);
        coord.report(1, false, &queue);

        // All idle but the frontier is not empty: not done, new cycle instead
        assert!(!coord.is_done());
        assert_eq!(status_of(&coord, 0), WorkerStatus::Ready);
        assert_eq!(status_of(&coord, 1), WorkerStatus::Ready);
    }

    #[test]
    fn test_status_reset_then_done_exactly_once() {
        let coord = CycleCoordinator::new(2);
        let queue = FrontierQueue::new();

        // First cycle: both idle over an empty queue -> done
        coord.park(0);
        coord.report(0, false, &queue);
        coord.park(1);
        coord.report(1, false, &queue);
        assert!(coord.is_done());

        // Late reports after the decision change nothing
        coord.report(0, false, &queue);
        coord.report(1, false, &queue);
        assert!(coord.is_done());
    }

    #[test]
    fn test_full_protocol_with_threads() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        // Each dequeued token below "fanout" spawns two children; a real
        // multi-threaded run must visit every token and terminate.
        let fanout = 64;
        let workers = 4;
        let coord = Arc::new(CycleCoordinator::new(workers));
        let queue = Arc::new(FrontierQueue::new());
        let visited = Arc::new(AtomicUsize::new(0));
        queue.enqueue("1".into());

        let mut handles = Vec::new();
        for id in 0..workers {
            let coord = Arc::clone(&coord);
            let queue = Arc::clone(&queue);
            let visited = Arc::clone(&visited);
            handles.push(std::thread::spawn(move || {
                while !coord.is_done() {
                    coord.park(id);
                    let did_work = match queue.dequeue() {
                        Some(token) => {
                            visited.fetch_add(1, Ordering::Relaxed);
                            let n: usize = token.parse().unwrap();
                            if n < fanout {
                                queue.enqueue((2 * n).to_string());
                                queue.enqueue((2 * n + 1).to_string());
                                true
                            } else {
                                false
                            }
                        }
                        None => false,
                    };
                    coord.report(id, did_work, &queue);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(coord.is_done());
        assert!(queue.is_empty());
        // Complete binary tree of tokens 1..2*fanout
        assert_eq!(visited.load(Ordering::Relaxed), 2 * fanout - 1);
    }
}
