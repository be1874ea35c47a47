//! Shared test helpers for checker and orchestrator tests.
//!
//! Provides a scripted [`NameserverQuery`] so checks can run without network
//! access.

use std::collections::{HashMap, VecDeque};
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::checker::{CheckSettings, RetryPolicy, VerificationRequest};
use crate::dns::{Answer, NameserverQuery, QueryType};
use crate::error_handling::QueryError;

/// Builds an answer from address literals.
pub fn answer(addresses: &[&str], ttl: u32) -> Answer {
    Answer {
        addresses: addresses
            .iter()
            .map(|a| a.parse::<IpAddr>().expect("valid address literal"))
            .collect(),
        ttl,
    }
}

/// The request used by the end-to-end scenarios: `1.2.3.4`, max TTL 300.
pub fn scenario_request() -> VerificationRequest {
    VerificationRequest {
        hostname: "example.com".to_string(),
        expected_address: "1.2.3.4".parse().expect("valid address"),
        max_ttl: 300,
    }
}

/// Quiet settings with a 30 second backoff, matching the defaults.
pub fn test_settings(workers: usize) -> CheckSettings {
    CheckSettings {
        workers,
        quiet: true,
        retry: RetryPolicy {
            max_attempts: 3,
            backoff: Duration::from_secs(30),
        },
    }
}

/// A querier that replays scripted responses per server address.
///
/// Each query pops the next scripted response; once a server's script is down
/// to its last response, that response repeats. Unscripted servers time out.
/// `tests/helpers.rs` `FakeNameservers` follows the same rules.
#[derive(Default)]
pub struct ScriptedQuery {
    scripts: Mutex<HashMap<SocketAddr, VecDeque<Result<Answer, QueryError>>>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every query sleeps for `delay` before answering.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Queues responses for `server` (a bare IP, port 53 implied).
    pub fn script(self, server: &str, responses: Vec<Result<Answer, QueryError>>) -> Self {
        let addr = crate::dns::parse_server_addr(server).expect("valid server address");
        self.scripts
            .lock()
            .expect("script lock")
            .entry(addr)
            .or_default()
            .extend(responses);
        self
    }

    /// Total number of queries issued across all servers.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of queries observed running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NameserverQuery for ScriptedQuery {
    async fn query(
        &self,
        server: SocketAddr,
        _hostname: &str,
        _query_type: QueryType,
    ) -> Result<Answer, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        let mut scripts = self.scripts.lock().expect("script lock");
        match scripts.get_mut(&server) {
            Some(script) if script.len() > 1 => script.pop_front().unwrap_or(Err(QueryError::Timeout)),
            Some(script) => script.front().cloned().unwrap_or(Err(QueryError::Timeout)),
            None => Err(QueryError::Timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_last_scripted_response_repeats() {
        let querier = ScriptedQuery::new().script(
            "8.8.8.8",
            vec![Err(QueryError::Timeout), Ok(answer(&["1.2.3.4"], 10))],
        );
        let server = crate::dns::parse_server_addr("8.8.8.8").expect("valid address");
        let other = crate::dns::parse_server_addr("9.9.9.9").expect("valid address");

        assert_eq!(
            querier.query(server, "example.com", QueryType::A).await,
            Err(QueryError::Timeout)
        );
        for _ in 0..3 {
            assert_eq!(
                querier.query(server, "example.com", QueryType::A).await,
                Ok(answer(&["1.2.3.4"], 10))
            );
        }
        assert_eq!(
            querier.query(other, "example.com", QueryType::A).await,
            Err(QueryError::Timeout)
        );
        assert_eq!(querier.calls(), 5);
    }
}
