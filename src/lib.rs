//! dirgrep - parallel directory tree search
//!
//! Explores a directory tree concurrently with a fixed pool of worker
//! threads, running a line-search over every file found. The interesting
//! part is not the filesystem plumbing but the termination protocol: N
//! independent workers sharing one frontier queue must agree, without a
//! central poller and without busy-waiting, that no worker will ever
//! produce work again.
//!
//! # How termination works
//!
//! The walk proceeds in cycles. Each cycle, every worker attempts exactly
//! one directory expansion and records whether it enqueued new
//! subdirectories. Workers that found nothing go to sleep on a per-worker
//! latch; a worker that enqueued work wakes them up. When a full cycle ends
//! with every worker idle and the frontier empty - checked inside a single
//! critical section, so the observation cannot race with a concurrent
//! enqueue - the walk is over. See [`walker::cycle`] for the protocol.
//!
//! # Example
//!
//! ```no_run
//! use dirgrep::config::SearchConfig;
//! use dirgrep::walker::SearchCoordinator;
//!
//! let mut config = SearchConfig::for_root("/data", 8);
//! config.pattern = "needle".into();
//!
//! let result = SearchCoordinator::new(config)?.run()?;
//! println!("{} of {} files matched", result.matched, result.files());
//! # Ok::<(), dirgrep::error::SearchError>(())
//! ```

pub mod config;
pub mod error;
pub mod fs;
pub mod matcher;
pub mod progress;
pub mod report;
pub mod walker;

pub use config::{CliArgs, SearchConfig};
pub use error::{Result, SearchError};
pub use walker::{SearchCoordinator, SearchResult};
