//! Leaf matchers
//!
//! A [`LeafMatcher`] decides whether a file satisfies the search predicate.
//! Two implementations are provided:
//!
//! - [`GrepMatcher`]: spawns an external line-search program (`grep -q` by
//!   default) once per file. The child process is given the pattern and path
//!   as plain argv entries, so no shell is involved and no escaping is
//!   needed.
//! - [`RegexMatcher`]: searches file contents in-process with the `regex`
//!   crate. Faster for small files and useful where no grep binary exists.
//!
//! Any failure (program missing, file vanished, unreadable contents) is
//! treated as a non-match. The walker never retries a matcher call.

use regex::Regex;
use std::fs;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

use crate::error::ConfigError;

/// Predicate applied to each file found during the walk
pub trait LeafMatcher: Send + Sync {
    /// Does the file at `path` match the search pattern?
    fn matches(&self, path: &str) -> bool;
}

/// Matcher that shells out to an external line-search program
pub struct GrepMatcher {
    /// Program to invoke (e.g. "grep")
    program: String,

    /// Pattern passed through to the program
    pattern: String,
}

impl GrepMatcher {
    /// Create a matcher invoking `program -q -- pattern path`
    pub fn new(program: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            pattern: pattern.into(),
        }
    }
}

impl LeafMatcher for GrepMatcher {
    fn matches(&self, path: &str) -> bool {
        let status = Command::new(&self.program)
            .arg("-q")
            .arg("--")
            .arg(&self.pattern)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) => status.success(),
            Err(e) => {
                warn!(program = %self.program, path = %path, error = %e, "Matcher invocation failed");
                false
            }
        }
    }
}

/// In-process matcher using the regex crate
pub struct RegexMatcher {
    pattern: Regex,
}

impl RegexMatcher {
    /// Compile the pattern; invalid patterns are a configuration error
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let pattern = Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            reason: e.to_string(),
        })?;
        Ok(Self { pattern })
    }
}

impl LeafMatcher for RegexMatcher {
    fn matches(&self, path: &str) -> bool {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(path = %path, error = %e, "File unreadable, treating as non-match");
                return false;
            }
        };

        let contents = String::from_utf8_lossy(&bytes);
        self.pattern.is_match(&contents)
    }
}
