//! Search coordinator - wires the walk together and runs it to completion
//!
//! The coordinator owns the frontier queue, the cycle coordinator, and the
//! worker pool. `run` seeds the frontier with the root, spawns the workers,
//! and blocks joining them; there is no completion-polling loop because the
//! cycle protocol itself decides when the walk is over and wakes every
//! worker for exit.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::config::SearchConfig;
use crate::error::Result;
use crate::fs::{DirectoryEnumerator, OsEnumerator};
use crate::matcher::{GrepMatcher, LeafMatcher, RegexMatcher};
use crate::report::{Reporter, ReportTotals};
use crate::walker::cycle::CycleCoordinator;
use crate::walker::expand::NodeExpander;
use crate::walker::queue::FrontierQueue;
use crate::walker::worker::{aggregate_stats, Worker, WorkerStats};

/// Result of a completed search
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Directories expanded
    pub directories: u64,

    /// Subdirectories enqueued over the whole walk
    pub enqueued: u64,

    /// Files that matched the pattern
    pub matched: u64,

    /// Files that did not match
    pub unmatched: u64,

    /// Children skipped by exclusion patterns
    pub excluded: u64,

    /// Event totals as seen by the reporter
    pub totals: ReportTotals,

    /// Time taken for the walk
    pub duration: Duration,
}

impl SearchResult {
    /// Total files checked
    pub fn files(&self) -> u64 {
        self.matched + self.unmatched
    }

    /// Did anything match?
    pub fn any_matches(&self) -> bool {
        self.matched > 0
    }
}

/// Coordinates the parallel search
pub struct SearchCoordinator {
    config: Arc<SearchConfig>,
    queue: Arc<FrontierQueue>,
    cycle: Arc<CycleCoordinator>,
    expander: Arc<NodeExpander>,
    workers: Vec<Worker>,
}

impl SearchCoordinator {
    /// Create a coordinator with the production collaborators: the OS
    /// directory enumerator and the matcher selected by the config
    pub fn new(config: SearchConfig) -> Result<Self> {
        let matcher: Arc<dyn LeafMatcher> = if config.builtin_matcher {
            Arc::new(RegexMatcher::new(&config.pattern)?)
        } else {
            Arc::new(GrepMatcher::new(&config.grep_program, &config.pattern))
        };

        Ok(Self::with_collaborators(config, Arc::new(OsEnumerator), matcher))
    }

    /// Create a coordinator with injected collaborators (tests use
    /// synthetic trees and instrumented matchers)
    pub fn with_collaborators(
        config: SearchConfig,
        enumerator: Arc<dyn DirectoryEnumerator>,
        matcher: Arc<dyn LeafMatcher>,
    ) -> Self {
        let expander = Arc::new(NodeExpander::new(
            enumerator,
            matcher,
            config.exclude_patterns.clone(),
        ));

        Self {
            cycle: Arc::new(CycleCoordinator::new(config.worker_count)),
            queue: Arc::new(FrontierQueue::new()),
            expander,
            config: Arc::new(config),
            workers: Vec::new(),
        }
    }

    /// Run the search, blocking until every worker has terminated
    pub fn run(mut self) -> Result<SearchResult> {
        let start = Instant::now();

        info!(
            root = %self.config.root,
            workers = self.config.worker_count,
            "Starting search"
        );

        let reporter = Reporter::new(self.config.report_mode)?;

        // Seed the frontier with the root; the first cycle takes it from here
        self.queue.enqueue(self.config.root.clone());

        self.spawn_workers(&reporter)?;
        let worker_stats = self.join_workers();

        let (dirs, enqueued, matched, unmatched, excluded) = aggregate_stats(&worker_stats);
        let totals = reporter.finish();
        let duration = start.elapsed();

        info!(
            dirs = dirs,
            files = matched + unmatched,
            matched = matched,
            duration_secs = duration.as_secs(),
            "Search completed"
        );

        Ok(SearchResult {
            directories: dirs,
            enqueued,
            matched,
            unmatched,
            excluded,
            totals,
            duration,
        })
    }

    /// Spawn the fixed worker pool
    fn spawn_workers(&mut self, reporter: &Reporter) -> Result<()> {
        for id in 0..self.config.worker_count {
            let worker = Worker::spawn(
                id,
                Arc::clone(&self.expander),
                Arc::clone(&self.queue),
                Arc::clone(&self.cycle),
                reporter.sender(),
            )?;
            self.workers.push(worker);
        }

        info!(count = self.workers.len(), "Workers spawned");
        Ok(())
    }

    /// Join all worker threads, keeping their stats readable afterwards
    fn join_workers(&mut self) -> Vec<Arc<WorkerStats>> {
        let workers = std::mem::take(&mut self.workers);
        let mut stats = Vec::with_capacity(workers.len());

        for worker in workers {
            let id = worker.id();
            stats.push(worker.stats_handle());
            if let Err(e) = worker.join() {
                warn!(worker = id, error = %e, "Worker failed to join cleanly");
            }
        }

        stats
    }
}
