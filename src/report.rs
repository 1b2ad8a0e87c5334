//! Search event reporting
//!
//! Workers do not print; they send [`SearchEvent`] records over an
//! unbounded channel to a dedicated reporter thread, which either echoes
//! them as `[worker] ACTION path` lines, drives a progress spinner, or
//! silently counts. Keeping output on one thread keeps event lines whole
//! and keeps I/O latency out of the walk itself.
//!
//! No ordering is promised between events from different workers; each
//! worker's own events arrive in the order it produced them.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::warn;

use crate::progress::ProgressSpinner;

/// One observable step of the walk
#[derive(Debug, Clone)]
pub enum SearchEvent {
    /// A worker began expanding a directory
    Directory { worker: usize, path: String },

    /// A worker enqueued a subdirectory
    Enqueue { worker: usize, path: String },

    /// A file matched the pattern
    Present { worker: usize, path: String },

    /// A file did not match the pattern
    Absent { worker: usize, path: String },
}

/// How the reporter surfaces events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// Print one line per event
    Events,
    /// Show a live spinner with running totals
    Progress,
    /// Count only
    Quiet,
}

/// Final event counts for the whole walk
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReportTotals {
    /// Directories expanded
    pub directories: u64,

    /// Subdirectories enqueued
    pub enqueued: u64,

    /// Files that matched
    pub present: u64,

    /// Files that did not match
    pub absent: u64,
}

/// Cloneable handle workers use to emit events
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<SearchEvent>,
}

impl EventSender {
    /// Emit one event; dropped silently if the reporter is gone
    pub fn send(&self, event: SearchEvent) {
        if self.sender.send(event).is_err() {
            warn!("Reporter thread gone, dropping event");
        }
    }
}

/// Owns the reporter thread and the receiving end of the event channel
pub struct Reporter {
    sender: Sender<SearchEvent>,
    handle: JoinHandle<ReportTotals>,
}

impl Reporter {
    /// Start the reporter thread
    ///
    /// Fails only on thread spawn failure (resource exhaustion).
    pub fn new(mode: ReportMode) -> std::io::Result<Self> {
        let (sender, receiver) = unbounded();
        let handle = thread::Builder::new()
            .name("reporter".into())
            .spawn(move || report_loop(receiver, mode))?;

        Ok(Self { sender, handle })
    }

    /// Get an event handle to clone into each worker
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Close the channel and collect final totals
    ///
    /// All worker-held senders must be dropped before this returns; the
    /// reporter thread exits once the channel drains.
    pub fn finish(self) -> ReportTotals {
        drop(self.sender);
        self.handle.join().unwrap_or_else(|_| {
            warn!("Reporter thread panicked, totals lost");
            ReportTotals::default()
        })
    }
}

fn report_loop(receiver: Receiver<SearchEvent>, mode: ReportMode) -> ReportTotals {
    let mut totals = ReportTotals::default();
    let spinner = match mode {
        ReportMode::Progress => Some(ProgressSpinner::new()),
        _ => None,
    };

    for event in receiver {
        match &event {
            SearchEvent::Directory { worker, path } => {
                totals.directories += 1;
                if mode == ReportMode::Events {
                    println!("[{}] DIR {}", worker, path);
                }
            }
            SearchEvent::Enqueue { worker, path } => {
                totals.enqueued += 1;
                if mode == ReportMode::Events {
                    println!("[{}] ENQUEUE {}", worker, path);
                }
            }
            SearchEvent::Present { worker, path } => {
                totals.present += 1;
                if mode == ReportMode::Events {
                    println!("[{}] PRESENT {}", worker, path);
                }
            }
            SearchEvent::Absent { worker, path } => {
                totals.absent += 1;
                if mode == ReportMode::Events {
                    println!("[{}] ABSENT {}", worker, path);
                }
            }
        }

        if let Some(ref spinner) = spinner {
            spinner.update(&totals);
        }
    }

    if let Some(spinner) = spinner {
        spinner.finish();
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_counted_in_quiet_mode() {
        let reporter = Reporter::new(ReportMode::Quiet).unwrap();
        let events = reporter.sender();

        events.send(SearchEvent::Directory {
            worker: 0,
            path: "/a".into(),
        });
        events.send(SearchEvent::Enqueue {
            worker: 0,
            path: "/a/b".into(),
        });
        events.send(SearchEvent::Present {
            worker: 1,
            path: "/a/x.txt".into(),
        });
        events.send(SearchEvent::Absent {
            worker: 1,
            path: "/a/y.txt".into(),
        });
        drop(events);

        let totals = reporter.finish();
        assert_eq!(totals.directories, 1);
        assert_eq!(totals.enqueued, 1);
        assert_eq!(totals.present, 1);
        assert_eq!(totals.absent, 1);
    }

    #[test]
    fn test_senders_clone_into_many_workers() {
        let reporter = Reporter::new(ReportMode::Quiet).unwrap();
        let mut handles = Vec::new();

        for worker in 0..4 {
            let events = reporter.sender();
            handles.push(std::thread::spawn(move || {
                for i in 0..50 {
                    events.send(SearchEvent::Absent {
                        worker,
                        path: format!("/f{}", i),
                    });
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(reporter.finish().absent, 200);
    }
}
