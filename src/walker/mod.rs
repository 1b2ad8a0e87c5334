//! Parallel directory walker
//!
//! The walk proceeds in synchronized cycles over a shared frontier:
//!
//! ```text
//!                  ┌──────────────────────────┐
//!                  │    SearchCoordinator     │
//!                  │  seed root, spawn, join  │
//!                  └────────────┬─────────────┘
//!                               │
//!        ┌──────────────┬───────┴──────┬──────────────┐
//!  ┌─────▼─────┐  ┌─────▼─────┐        │        ┌─────▼─────┐
//!  │  Worker 0 │  │  Worker 1 │       ...       │ Worker N-1│
//!  │ park/run  │  │ park/run  │                 │ park/run  │
//!  └─────┬─────┘  └─────┬─────┘                 └─────┬─────┘
//!        │              │                             │
//!        │   ┌──────────▼───────────┐   ┌─────────────▼────────────┐
//!        └───►     FrontierQueue    │   │     CycleCoordinator     │
//!            │   (FIFO of dirs)     │   │ statuses, latches, done  │
//!            └──────────────────────┘   └──────────────────────────┘
//! ```
//!
//! Each worker attempts exactly one expansion per cycle, then reports to
//! the cycle coordinator, which decides whether to wake idle workers, open
//! the next cycle, or declare the walk done (see the cycle module for the
//! protocol).

pub mod coordinator;
pub mod cycle;
pub mod expand;
pub mod queue;
pub mod worker;

pub use coordinator::{SearchCoordinator, SearchResult};
pub use cycle::{CycleCoordinator, WorkerStatus};
pub use expand::NodeExpander;
pub use queue::FrontierQueue;
pub use worker::{Worker, WorkerStats};
