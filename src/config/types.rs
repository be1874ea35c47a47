//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::checker::{CheckSettings, RetryPolicy, VerificationRequest};
use crate::config::constants::{
    DEFAULT_FAIL_ON_PCT_THRESHOLD, DEFAULT_SOURCE_URL, DEFAULT_WORKERS, DNS_TIMEOUT_SECS,
    RETRY_BACKOFF_SECS, RETRY_MAX_ATTEMPTS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// When a completed audit should end with a non-zero exit code.
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FailOn {
    /// Always exit 0 once the audit completes
    Never,
    /// Exit 2 if any server failed or errored
    AnyFailure,
    /// Exit 2 if the failing share of servers is above `--fail-on-pct-threshold`
    PctGreaterThan,
}

/// Audit configuration.
///
/// Parsed from the command line by the binary, or built programmatically by
/// library users.
///
/// # Examples
///
/// ```no_run
/// use dns_audit::Config;
///
/// let config = Config {
///     dnsname: "example.com".to_string(),
///     correct_ip: "93.184.216.34".parse().unwrap(),
///     ttlmax: 300,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dns_audit",
    version,
    about = "Checks that public nameservers serve the expected address and TTL for a hostname"
)]
pub struct Config {
    /// The hostname you are testing, ie example.com
    #[arg(short = 'd', long = "dnsname")]
    pub dnsname: String,

    /// The IP address you believe to be correct
    #[arg(short = 'c', long = "correct-ip")]
    pub correct_ip: IpAddr,

    /// The TTL set by the authoritative name server
    #[arg(short = 't', long = "ttlmax")]
    pub ttlmax: u32,

    /// URL, file path or `-` (stdin) listing DNS servers, one per line
    #[arg(short = 's', long = "sourceurl", default_value = DEFAULT_SOURCE_URL)]
    pub sourceurl: String,

    /// Maximum number of servers checked concurrently
    #[arg(short = 'w', long = "workers", default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Suppress individual failures (timeout, wrong address, ttl too high)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Query attempts per server before it is reported as timed out
    #[arg(long, default_value_t = RETRY_MAX_ATTEMPTS)]
    pub attempts: usize,

    /// Seconds to wait between attempts against the same server
    #[arg(long, default_value_t = RETRY_BACKOFF_SECS)]
    pub backoff_secs: u64,

    /// Timeout for a single DNS query, in seconds
    #[arg(long, default_value_t = DNS_TIMEOUT_SECS)]
    pub query_timeout_secs: u64,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Exit code policy once the audit completes
    #[arg(long, value_enum, default_value_t = FailOn::Never)]
    pub fail_on: FailOn,

    /// Failure percentage used by `--fail-on pct-greater-than` (0-100)
    #[arg(
        long,
        default_value_t = DEFAULT_FAIL_ON_PCT_THRESHOLD,
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub fail_on_pct_threshold: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dnsname: String::new(),
            correct_ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            ttlmax: 300,
            sourceurl: DEFAULT_SOURCE_URL.to_string(),
            workers: DEFAULT_WORKERS,
            quiet: false,
            attempts: RETRY_MAX_ATTEMPTS,
            backoff_secs: RETRY_BACKOFF_SECS,
            query_timeout_secs: DNS_TIMEOUT_SECS,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            fail_on: FailOn::Never,
            fail_on_pct_threshold: DEFAULT_FAIL_ON_PCT_THRESHOLD,
        }
    }
}

impl Config {
    /// The request every server is checked against.
    pub fn verification_request(&self) -> VerificationRequest {
        VerificationRequest {
            hostname: self.dnsname.clone(),
            expected_address: self.correct_ip,
            max_ttl: self.ttlmax,
        }
    }

    /// Per-server check settings. Zero workers or attempts are raised to one.
    pub fn check_settings(&self) -> CheckSettings {
        CheckSettings {
            workers: self.workers.max(1),
            quiet: self.quiet,
            retry: RetryPolicy {
                max_attempts: self.attempts.max(1),
                backoff: Duration::from_secs(self.backoff_secs),
            },
        }
    }

    /// Timeout applied to each individual DNS query.
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}
