//! Node expansion
//!
//! Expanding a directory means listing its children, enqueueing every
//! subdirectory onto the frontier, and running the leaf matcher over every
//! file. The expander reports whether it enqueued anything; that bit feeds
//! the cycle coordinator's termination decision. Match results are reported
//! as events and deliberately do not count as "work" - only newly
//! discovered directories can keep the walk alive.

use regex::Regex;
use std::sync::Arc;
use tracing::trace;

use crate::fs::{join_child, DirectoryEnumerator, EntryKind};
use crate::matcher::LeafMatcher;
use crate::report::{EventSender, SearchEvent};
use crate::walker::queue::FrontierQueue;
use crate::walker::worker::WorkerStats;

/// Expands one directory at a time against the frontier queue
pub struct NodeExpander {
    enumerator: Arc<dyn DirectoryEnumerator>,
    matcher: Arc<dyn LeafMatcher>,
    exclude: Vec<Regex>,
}

impl NodeExpander {
    /// Create an expander over the given collaborators
    pub fn new(
        enumerator: Arc<dyn DirectoryEnumerator>,
        matcher: Arc<dyn LeafMatcher>,
        exclude: Vec<Regex>,
    ) -> Self {
        Self {
            enumerator,
            matcher,
            exclude,
        }
    }

    /// Expand the directory at `path`
    ///
    /// Returns true if at least one subdirectory was enqueued. A directory
    /// that cannot be read simply has no children here; the walk is
    /// best-effort over a live filesystem.
    pub fn expand(
        &self,
        worker_id: usize,
        path: &str,
        queue: &FrontierQueue,
        events: &EventSender,
        stats: &WorkerStats,
    ) -> bool {
        events.send(SearchEvent::Directory {
            worker: worker_id,
            path: path.to_string(),
        });
        stats.record_dir();

        let mut did_enqueue = false;
        for child in self.enumerator.children_of(path) {
            // Defensive: no backend we use surfaces these, but a custom
            // enumerator might
            if child.name == "." || child.name == ".." {
                continue;
            }

            let child_path = join_child(path, &child.name);

            if self.is_excluded(&child_path) {
                trace!(worker = worker_id, path = %child_path, "Excluded");
                stats.record_excluded();
                continue;
            }

            match child.kind {
                EntryKind::Directory => {
                    queue.enqueue(child_path.clone());
                    did_enqueue = true;
                    stats.record_enqueue();
                    events.send(SearchEvent::Enqueue {
                        worker: worker_id,
                        path: child_path,
                    });
                }
                EntryKind::File => {
                    let matched = self.matcher.matches(&child_path);
                    if matched {
                        stats.record_match();
                        events.send(SearchEvent::Present {
                            worker: worker_id,
                            path: child_path,
                        });
                    } else {
                        stats.record_non_match();
                        events.send(SearchEvent::Absent {
                            worker: worker_id,
                            path: child_path,
                        });
                    }
                }
            }
        }

        did_enqueue
    }

    fn is_excluded(&self, path: &str) -> bool {
        self.exclude.iter().any(|re| re.is_match(path))
    }
}
