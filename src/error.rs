//! Error types for dirgrep
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - Errors should be actionable - include context about what to do
//! - Recoverable conditions (unreadable directory, vanished file) are not
//!   errors at all; they degrade to "no children" or "no match" inside the
//!   walker and never surface here

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the dirgrep application
#[derive(Error, Debug)]
pub enum SearchError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    /// I/O errors (resolving the root path, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Empty or unusable search pattern
    #[error("Invalid search pattern: {reason}")]
    InvalidPattern { reason: String },

    /// Root path missing or not a directory
    #[error("Invalid search root '{path}': {reason}")]
    InvalidRoot { path: PathBuf, reason: String },

    /// Invalid exclude pattern
    #[error("Invalid exclude pattern '{pattern}': {reason}")]
    InvalidExcludePattern { pattern: String, reason: String },
}

/// Worker thread errors
///
/// Thread spawn failure is the one fatal class in the walker (resource
/// exhaustion); everything else a worker encounters is handled locally.
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker initialization failed
    #[error("Failed to spawn worker {id}: {reason}")]
    InitFailed { id: usize, reason: String },

    /// Worker panicked
    #[error("Worker {id} panicked")]
    Panicked { id: usize },
}

/// Result type alias for SearchError
pub type Result<T> = std::result::Result<T, SearchError>;
