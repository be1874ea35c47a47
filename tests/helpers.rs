// Shared test helpers for verification scenarios.
//
// Provides a scripted nameserver so runs can be exercised without network access.

use std::collections::{HashMap, VecDeque};
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use dns_audit::dns::{parse_server_addr, Answer, NameserverQuery, QueryType};
use dns_audit::{CheckSettings, QueryError, RetryPolicy, VerificationRequest};

/// Builds an answer from address literals.
#[allow(dead_code)] // Used by other test files
pub fn answer(addresses: &[&str], ttl: u32) -> Answer {
    Answer {
        addresses: addresses
            .iter()
            .map(|a| a.parse::<IpAddr>().expect("valid address literal"))
            .collect(),
        ttl,
    }
}

/// `example.com` expected at `1.2.3.4` with a max TTL of 300.
#[allow(dead_code)]
pub fn example_request() -> VerificationRequest {
    VerificationRequest {
        hostname: "example.com".to_string(),
        expected_address: "1.2.3.4".parse().expect("valid address"),
        max_ttl: 300,
    }
}

/// Quiet settings with the default retry policy (3 attempts, 30s backoff).
#[allow(dead_code)]
pub fn quiet_settings(workers: usize) -> CheckSettings {
    CheckSettings {
        workers,
        quiet: true,
        retry: RetryPolicy {
            max_attempts: 3,
            backoff: Duration::from_secs(30),
        },
    }
}

/// A nameserver population whose responses are scripted per server.
///
/// Each query pops the next scripted response; once a server's script is
/// down to its last response, that response repeats. Unscripted servers time
/// out. The crate's internal `ScriptedQuery` follows the same rules.
#[derive(Default)]
pub struct FakeNameservers {
    scripts: Mutex<HashMap<SocketAddr, VecDeque<Result<Answer, QueryError>>>>,
    queries: Mutex<HashMap<SocketAddr, usize>>,
    total: AtomicUsize,
}

#[allow(dead_code)]
impl FakeNameservers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts `server` (bare IP or `ip:port`) with `responses` in order.
    pub fn with(self, server: &str, responses: Vec<Result<Answer, QueryError>>) -> Self {
        let addr = parse_server_addr(server).expect("valid server address");
        self.scripts
            .lock()
            .expect("scripts lock")
            .insert(addr, responses.into());
        self
    }

    /// Queries received by `server`.
    pub fn queries_to(&self, server: &str) -> usize {
        let addr = parse_server_addr(server).expect("valid server address");
        self.queries
            .lock()
            .expect("queries lock")
            .get(&addr)
            .copied()
            .unwrap_or(0)
    }

    /// Queries received across all servers.
    pub fn total_queries(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NameserverQuery for FakeNameservers {
    async fn query(
        &self,
        server: SocketAddr,
        _hostname: &str,
        _query_type: QueryType,
    ) -> Result<Answer, QueryError> {
        self.total.fetch_add(1, Ordering::SeqCst);
        *self
            .queries
            .lock()
            .expect("queries lock")
            .entry(server)
            .or_insert(0) += 1;

        let mut scripts = self.scripts.lock().expect("scripts lock");
        match scripts.get_mut(&server) {
            Some(script) if script.len() > 1 => script.pop_front().unwrap_or(Err(QueryError::Timeout)),
            Some(script) => script.front().cloned().unwrap_or(Err(QueryError::Timeout)),
            None => Err(QueryError::Timeout),
        }
    }
}
