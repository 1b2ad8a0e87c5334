//! Configuration types for dirgrep
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation

use clap::Parser;
use regex::Regex;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::fs::absolutize;
use crate::report::ReportMode;

/// Maximum reasonable worker count
const MAX_WORKERS: usize = 512;

/// Parallel directory tree search
#[derive(Parser, Debug, Clone)]
#[command(
    name = "dirgrep",
    version,
    about = "Parallel directory tree search",
    long_about = "Walks a directory tree with a fixed pool of worker threads and runs a \
                  line-search over every file found.\n\n\
                  By default each file is checked with an external grep invocation; \
                  --builtin switches to an in-process regex search.",
    after_help = "EXAMPLES:\n    \
        dirgrep TODO src -w 8\n    \
        dirgrep 'fn main' ~/projects --builtin -q\n    \
        dirgrep needle /data --exclude '\\.git' --exclude 'target' -p"
)]
pub struct CliArgs {
    /// Pattern to search for in file contents
    #[arg(value_name = "PATTERN")]
    pub pattern: String,

    /// Root directory to search (default: current directory)
    #[arg(value_name = "ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Number of worker threads
    #[arg(short = 'w', long, default_value_t = default_workers(), value_name = "NUM")]
    pub workers: usize,

    /// External line-search program to invoke per file
    #[arg(long, default_value = "grep", value_name = "PROGRAM")]
    pub grep_bin: String,

    /// Search file contents in-process instead of invoking an external program
    #[arg(long)]
    pub builtin: bool,

    /// Exclude paths matching pattern (can be repeated)
    #[arg(long = "exclude", value_name = "PATTERN", action = clap::ArgAction::Append)]
    pub exclude_patterns: Vec<String>,

    /// Quiet mode - suppress per-file output, print only the summary
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Show a live progress spinner instead of per-file output
    #[arg(short = 'p', long)]
    pub progress: bool,

    /// Verbose logging (show skipped directories and matcher failures)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

fn default_workers() -> usize {
    num_cpus::get()
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Pattern passed to the matcher
    pub pattern: String,

    /// Absolute root identifier the frontier is seeded with
    pub root: String,

    /// Number of worker threads
    pub worker_count: usize,

    /// External line-search program
    pub grep_program: String,

    /// Use the in-process regex matcher
    pub builtin_matcher: bool,

    /// Compiled exclude patterns
    pub exclude_patterns: Vec<Regex>,

    /// How events are reported
    pub report_mode: ReportMode,
}

impl SearchConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        if args.pattern.is_empty() {
            return Err(ConfigError::InvalidPattern {
                reason: "pattern must not be empty".into(),
            });
        }

        if args.workers == 0 || args.workers > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: args.workers,
                max: MAX_WORKERS,
            });
        }

        let root_meta = std::fs::metadata(&args.root).map_err(|e| ConfigError::InvalidRoot {
            path: args.root.clone(),
            reason: e.to_string(),
        })?;
        if !root_meta.is_dir() {
            return Err(ConfigError::InvalidRoot {
                path: args.root.clone(),
                reason: "not a directory".into(),
            });
        }

        let root = absolutize(&args.root).map_err(|e| ConfigError::InvalidRoot {
            path: args.root.clone(),
            reason: e.to_string(),
        })?;

        let exclude_patterns = args
            .exclude_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| ConfigError::InvalidExcludePattern {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let report_mode = if args.quiet {
            ReportMode::Quiet
        } else if args.progress {
            ReportMode::Progress
        } else {
            ReportMode::Events
        };

        Ok(Self {
            pattern: args.pattern,
            root,
            worker_count: args.workers,
            grep_program: args.grep_bin,
            builtin_matcher: args.builtin,
            exclude_patterns,
            report_mode,
        })
    }

    /// Minimal configuration for library callers and tests
    pub fn for_root(root: impl Into<String>, worker_count: usize) -> Self {
        Self {
            pattern: String::new(),
            root: root.into(),
            worker_count,
            grep_program: "grep".into(),
            builtin_matcher: true,
            exclude_patterns: Vec::new(),
            report_mode: ReportMode::Quiet,
        }
    }
}
