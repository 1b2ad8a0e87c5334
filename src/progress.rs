//! Progress display and run summary
//!
//! Provides the optional live spinner (indicatif) plus the styled header
//! and summary printed around a run. All of this lives outside the walker
//! core; workers only ever talk to the event channel.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::report::ReportTotals;

/// Live spinner showing running totals
pub struct ProgressSpinner {
    bar: ProgressBar,
}

impl ProgressSpinner {
    /// Create and start the spinner
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .expect("Invalid progress template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Refresh the spinner message with current totals
    pub fn update(&self, totals: &ReportTotals) {
        self.bar.set_message(format!(
            "Dirs: {} | Matched: {} | Checked: {} | Pending: {}",
            format_number(totals.directories),
            format_number(totals.present),
            format_number(totals.present + totals.absent),
            format_number(totals.enqueued.saturating_sub(totals.directories)),
        ));
    }

    /// Stop the spinner and clear the line
    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressSpinner {
    fn default() -> Self {
        Self::new()
    }
}

/// Print the run header
pub fn print_header(root: &str, pattern: &str, workers: usize) {
    println!(
        "{} {}",
        style("Searching:").bold(),
        style(root).cyan()
    );
    println!(
        "{} {}  {} {}  {} {}",
        style("Pattern:").bold(),
        pattern,
        style("Workers:").bold(),
        workers,
        style("Started:").bold(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
    );
    println!();
}

/// Print the run summary
pub fn print_summary(totals: &ReportTotals, duration: Duration) {
    let files = totals.present + totals.absent;
    let rate = if duration.as_secs_f64() > 0.0 {
        files as f64 / duration.as_secs_f64()
    } else {
        0.0
    };

    println!();
    println!("{}", style("Search complete").green().bold());
    println!("  Directories: {}", format_number(totals.directories));
    println!("  Files:       {}", format_number(files));
    println!(
        "  Matched:     {}",
        style(format_number(totals.present)).green()
    );
    println!("  Duration:    {:.2}s ({:.0} files/s)", duration.as_secs_f64(), rate);
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
