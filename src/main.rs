//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `dns_audit` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Exit code selection
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::process;

use dns_audit::app::{evaluate_exit_code, EXIT_FATAL};
use dns_audit::initialization::init_logger_with;
use dns_audit::{run_audit, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    let fail_on = config.fail_on.clone();
    let pct_threshold = config.fail_on_pct_threshold;

    match run_audit(config).await {
        Ok(report) => {
            info!(
                "Audit of {} servers finished in {:.1}s",
                report.summary.total, report.elapsed_seconds
            );
            let code = evaluate_exit_code(&fail_on, pct_threshold, &report.summary);
            if code != 0 {
                process::exit(code);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("dns_audit error: {:#}", e);
            process::exit(EXIT_FATAL);
        }
    }
}
