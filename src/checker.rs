//! Per-server query and validation.
//!
//! A check sends the query to one nameserver, retrying recoverable failures
//! with a fixed backoff, then validates the answer: addresses first, TTL second.

use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use log::{debug, warn};
use tokio_retry::strategy::FixedInterval;
use tokio_retry::RetryIf;

use crate::config::{DEFAULT_WORKERS, RETRY_BACKOFF, RETRY_MAX_ATTEMPTS};
use crate::dns::{parse_server_addr, Answer, NameserverQuery, QueryType};
use crate::error_handling::{CheckError, QueryError};
use crate::failure::{CheckResult, Failure, Outcome};

/// What every server is checked against. Shared read-only by all checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    /// Hostname to resolve
    pub hostname: String,
    /// The only address the answer may contain
    pub expected_address: IpAddr,
    /// Largest acceptable RRset TTL, in seconds
    pub max_ttl: u32,
}

/// Attempt budget and pause between attempts for a single server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total query attempts, including the first
    pub max_attempts: usize,
    /// Fixed pause after each failed attempt that will be retried
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_MAX_ATTEMPTS,
            backoff: RETRY_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Delays between attempts, as consumed by `tokio_retry`.
    ///
    /// One delay per retry, so `max_attempts - 1` of them.
    fn strategy(&self) -> impl Iterator<Item = Duration> {
        FixedInterval::new(self.backoff).take(self.max_attempts.saturating_sub(1))
    }
}

/// Settings shared by every check of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSettings {
    /// Maximum number of checks in flight
    pub workers: usize,
    /// Suppress the per-server failure lines
    pub quiet: bool,
    /// Per-server retry policy
    pub retry: RetryPolicy,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            quiet: false,
            retry: RetryPolicy::default(),
        }
    }
}

/// Validates an answer against the request.
///
/// Address mismatches are reported before TTL violations: an answer with both
/// defects is a [`Failure::WrongAddress`].
pub fn validate_answer(
    server: &str,
    answer: &Answer,
    request: &VerificationRequest,
) -> Option<Failure> {
    if let Some(observed) = answer
        .addresses
        .iter()
        .find(|address| **address != request.expected_address)
    {
        return Some(Failure::WrongAddress {
            server: server.to_string(),
            observed_address: *observed,
        });
    }

    if answer.ttl > request.max_ttl {
        return Some(Failure::TtlExceeded {
            server: server.to_string(),
            observed_ttl: answer.ttl,
        });
    }

    None
}

/// Checks a single server.
///
/// Recoverable query errors (timeout, no answer, unreachable) are retried up
/// to `settings.retry.max_attempts` times in total, pausing
/// `settings.retry.backoff` between attempts; when the budget is spent the
/// server is reported as [`Failure::QueryTimeout`]. Any other query error ends
/// the check at once with [`CheckError::Query`].
///
/// Unless `settings.quiet` is set, a failure is printed on stdout as soon as
/// it is known.
pub async fn check_server<Q>(
    server: &str,
    request: &VerificationRequest,
    querier: &Q,
    settings: &CheckSettings,
) -> CheckResult
where
    Q: NameserverQuery + ?Sized,
{
    check_server_with_reporter(server, request, querier, settings, &|failure: &Failure| {
        println!("{failure}")
    })
    .await
}

/// Same as [`check_server`], handing each failure line to `report` instead of
/// stdout. `report` is not called when `settings.quiet` is set.
pub async fn check_server_with_reporter<Q>(
    server: &str,
    request: &VerificationRequest,
    querier: &Q,
    settings: &CheckSettings,
    report: &(dyn Fn(&Failure) + Sync),
) -> CheckResult
where
    Q: NameserverQuery + ?Sized,
{
    let Some(addr) = parse_server_addr(server) else {
        let error = CheckError::InvalidServer {
            server: server.to_string(),
        };
        warn!("{error}");
        return CheckResult {
            server: server.to_string(),
            outcome: Outcome::Errored(error),
            attempts: 0,
        };
    };

    let query_type = QueryType::for_address(&request.expected_address);
    let hostname: &str = &request.hostname;
    let attempts = AtomicUsize::new(0);
    let attempts_ref = &attempts;

    let result = RetryIf::spawn(
        settings.retry.strategy(),
        move || {
            let attempt = attempts_ref.fetch_add(1, Ordering::SeqCst) + 1;
            debug!("Querying {server} for {hostname} (attempt {attempt})");
            async move {
                match querier.query(addr, hostname, query_type).await {
                    Ok(answer) if answer.addresses.is_empty() => Err(QueryError::NoAnswer),
                    other => other,
                }
            }
        },
        |error: &QueryError| {
            let retry = error.is_recoverable();
            if retry {
                debug!("Attempt against {server} failed: {error}");
            }
            retry
        },
    )
    .await;

    let outcome = match result {
        Ok(answer) => match validate_answer(server, &answer, request) {
            Some(failure) => Outcome::Failed(failure),
            None => Outcome::Compliant,
        },
        Err(error) if error.is_recoverable() => Outcome::Failed(Failure::QueryTimeout {
            server: server.to_string(),
        }),
        Err(error) => Outcome::Errored(CheckError::Query {
            server: server.to_string(),
            source: error,
        }),
    };

    if let Outcome::Errored(error) = &outcome {
        warn!("{error}");
    }
    if let Some(failure) = outcome.failure() {
        if !settings.quiet {
            report(failure);
        }
    }

    CheckResult {
        server: server.to_string(),
        outcome,
        attempts: attempts.load(Ordering::SeqCst),
    }
}
