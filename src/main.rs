//! dirgrep - parallel directory tree search
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use dirgrep::config::{CliArgs, SearchConfig};
use dirgrep::progress::{print_header, print_summary};
use dirgrep::report::ReportMode;
use dirgrep::walker::SearchCoordinator;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(matched) => {
            // grep convention: success when something matched
            if matched {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<bool> {
    let args = CliArgs::parse();

    setup_logging(args.verbose)?;

    let config = SearchConfig::from_args(args).context("Invalid configuration")?;

    // The walker has no internal cancellation hook; an interrupt simply
    // force-terminates the process
    ctrlc::set_handler(|| {
        eprintln!("\nInterrupt received, aborting search");
        std::process::exit(130);
    })
    .context("Failed to set signal handler")?;

    let show_summary = config.report_mode != ReportMode::Quiet;
    if show_summary {
        print_header(&config.root, &config.pattern, config.worker_count);
    }

    let result = SearchCoordinator::new(config)
        .context("Failed to initialize walker")?
        .run()
        .context("Search failed")?;

    if show_summary {
        print_summary(&result.totals, result.duration);
    }

    Ok(result.any_matches())
}

/// Initialize tracing with an env-filter; `-v` raises the default level
fn setup_logging(verbose: bool) -> Result<()> {
    let default_filter = if verbose { "dirgrep=debug" } else { "dirgrep=warn" };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
