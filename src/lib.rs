//! dns_audit library: checks public nameservers against an authoritative answer
//!
//! Given a hostname, the address it should resolve to and the highest TTL a
//! resolver may serve, every nameserver in a list is queried directly and
//! classified as compliant, timed out, serving the wrong address, or caching
//! with too high a TTL.
//!
//! # Example
//!
//! ```no_run
//! use dns_audit::{run_audit, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     dnsname: "example.com".to_string(),
//!     correct_ip: "93.184.216.34".parse()?,
//!     ttlmax: 300,
//!     sourceurl: "nameservers.txt".to_string(),
//!     quiet: true,
//!     ..Default::default()
//! };
//!
//! let report = run_audit(config).await?;
//! println!("{} of {} servers failed", report.summary.failed(), report.summary.total);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

mod aggregate;
pub mod app;
mod checker;
pub mod config;
pub mod dns;
mod error_handling;
mod failure;
pub mod initialization;
mod orchestrator;
mod source;

#[cfg(test)]
mod test_helpers;

// Re-export public API
pub use aggregate::{summarize, Summary};
pub use checker::{
    check_server, check_server_with_reporter, validate_answer, CheckSettings, RetryPolicy,
    VerificationRequest,
};
pub use config::{Config, FailOn, LogFormat, LogLevel};
pub use error_handling::{CheckError, InitializationError, QueryError, SourceError};
pub use failure::{CheckResult, Failure, FailureKind, Outcome};
pub use orchestrator::run_all;
pub use run::{run_audit, AuditReport};
pub use source::{load_servers, parse_server_list};

// Internal run module (wires source, orchestrator and report together)
mod run {
    use anyhow::{Context, Result};
    use log::info;
    use std::sync::Arc;
    use std::time::Instant;

    use crate::aggregate::{summarize, Summary};
    use crate::app::print_summary;
    use crate::config::Config;
    use crate::dns::HickoryQuery;
    use crate::failure::CheckResult;
    use crate::initialization::init_client;
    use crate::orchestrator::run_all;
    use crate::source::load_servers;

    /// Results of an audit run.
    #[derive(Debug, Clone)]
    pub struct AuditReport {
        /// Tallies over every server checked
        pub summary: Summary,
        /// One result per server, in completion order
        pub results: Vec<CheckResult>,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    /// Runs an audit with the provided configuration.
    ///
    /// Loads the server list, checks every server and prints the summary on
    /// stdout. Individual failures are printed as they happen unless
    /// `config.quiet` is set.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The HTTP client cannot be created
    /// - The server list cannot be read, or is empty
    ///
    /// No server is queried in either case. Per-server problems never fail
    /// the run; they are part of the report.
    pub async fn run_audit(config: Config) -> Result<AuditReport> {
        let client = init_client().context("Failed to initialize HTTP client")?;
        let servers = load_servers(&config.sourceurl, &client)
            .await
            .context("Failed to load server list")?;

        let request = Arc::new(config.verification_request());
        let settings = config.check_settings();
        let querier = Arc::new(HickoryQuery::new(config.query_timeout()));

        info!(
            "Verifying {} -> {} (max ttl {}) with {} attempts, {}s backoff",
            request.hostname,
            request.expected_address,
            request.max_ttl,
            settings.retry.max_attempts,
            settings.retry.backoff.as_secs()
        );
        println!("Testing {} servers", servers.len());

        let start_time = Instant::now();
        let results = run_all(servers, request, querier, settings).await;
        let summary = summarize(&results);
        print_summary(&summary);

        Ok(AuditReport {
            summary,
            results,
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
        })
    }
}
