//! Configuration constants.
//!
//! This module defines the operational defaults used throughout the application:
//! the server list source, concurrency, retry policy and DNS timeouts.

use std::time::Duration;

/// Default source of nameserver addresses (one per line).
pub const DEFAULT_SOURCE_URL: &str = "http://public-dns.info/nameservers.txt";

/// Default number of concurrent server checks (semaphore limit).
/// Almost all of a check's time is spent waiting on the network or in backoff,
/// so this is far above the number of CPUs.
pub const DEFAULT_WORKERS: usize = 1000;

// Retry strategy
/// Maximum number of query attempts per server (including the initial attempt)
/// Set to 3 = initial attempt + 2 retries
pub const RETRY_MAX_ATTEMPTS: usize = 3;
/// Fixed pause between a failed attempt and the next one, in seconds
pub const RETRY_BACKOFF_SECS: u64 = 30;

// Network operation timeouts
/// DNS query timeout in seconds for a single attempt
pub const DNS_TIMEOUT_SECS: u64 = 5;
/// Port used when a server entry is a bare IP address
pub const DNS_PORT: u16 = 53;

/// Timeout for fetching the server list over HTTP, in seconds
pub const SOURCE_FETCH_TIMEOUT_SECS: u64 = 30;

/// Progress logging interval in seconds
pub const LOGGING_INTERVAL: u64 = 5;

/// Default failure percentage threshold for `--fail-on pct-greater-than`
pub const DEFAULT_FAIL_ON_PCT_THRESHOLD: u8 = 10;

/// Default backoff as a `Duration`.
pub const RETRY_BACKOFF: Duration = Duration::from_secs(RETRY_BACKOFF_SECS);
