//! `hickory-resolver` implementation of [`NameserverQuery`].

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::error::ProtoErrorKind;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::{RData, Record, RecordType};
use hickory_resolver::TokioAsyncResolver;

use super::query::{Answer, NameserverQuery, QueryType};
use crate::error_handling::QueryError;

/// Queries nameservers with a fresh single-server resolver per query.
///
/// A fresh resolver means no answer is ever served from a cache, so the TTL
/// reported is the one the nameserver sent.
#[derive(Debug, Clone)]
pub struct HickoryQuery {
    timeout: Duration,
}

impl HickoryQuery {
    /// Creates a querier whose attempts give up after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn resolver_for(&self, server: SocketAddr) -> TokioAsyncResolver {
        let name_servers = NameServerConfigGroup::from_ips_clear(&[server.ip()], server.port(), true);
        let config = ResolverConfig::from_parts(None, vec![], name_servers);

        let mut opts = ResolverOpts::default();
        opts.timeout = self.timeout;
        opts.attempts = 1; // retries are handled by the checker
        opts.ndots = 0;
        opts.use_hosts_file = false;

        TokioAsyncResolver::tokio(config, opts)
    }
}

#[async_trait]
impl NameserverQuery for HickoryQuery {
    async fn query(
        &self,
        server: SocketAddr,
        hostname: &str,
        query_type: QueryType,
    ) -> Result<Answer, QueryError> {
        let record_type = record_type(query_type);
        let resolver = self.resolver_for(server);
        let lookup = resolver
            .lookup(hostname, record_type)
            .await
            .map_err(classify_resolve_error)?;
        answer_from_records(lookup.records(), record_type)
    }
}

fn record_type(query_type: QueryType) -> RecordType {
    match query_type {
        QueryType::A => RecordType::A,
        QueryType::Aaaa => RecordType::AAAA,
    }
}

/// Builds an [`Answer`] from the records of the requested type.
///
/// CNAME records leading to the addresses are skipped. The TTL is taken from
/// the address RRset.
pub(crate) fn answer_from_records(
    records: &[Record],
    record_type: RecordType,
) -> Result<Answer, QueryError> {
    let mut addresses = Vec::new();
    let mut ttl = None;
    for record in records.iter().filter(|r| r.record_type() == record_type) {
        let address = match record.data() {
            Some(RData::A(a)) => IpAddr::V4(a.0),
            Some(RData::AAAA(aaaa)) => IpAddr::V6(aaaa.0),
            _ => continue,
        };
        ttl.get_or_insert(record.ttl());
        addresses.push(address);
    }

    match ttl {
        Some(ttl) => Ok(Answer { addresses, ttl }),
        None => Err(QueryError::NoAnswer),
    }
}

/// Maps a resolver error onto the recoverable/non-recoverable taxonomy.
///
/// NXDOMAIN is authoritative and not retried. SERVFAIL, REFUSED and I/O errors
/// mean the server could not serve the query and count as unreachable.
pub(crate) fn classify_resolve_error(err: ResolveError) -> QueryError {
    match err.kind() {
        ResolveErrorKind::Timeout => QueryError::Timeout,
        ResolveErrorKind::NoConnections => QueryError::NoNameservers(err.to_string()),
        ResolveErrorKind::NoRecordsFound { response_code, .. } => match *response_code {
            ResponseCode::NoError => QueryError::NoAnswer,
            ResponseCode::NXDomain => QueryError::Other(err.to_string()),
            _ => QueryError::NoNameservers(err.to_string()),
        },
        ResolveErrorKind::Io(_) => QueryError::NoNameservers(err.to_string()),
        ResolveErrorKind::Proto(proto) => match proto.kind() {
            ProtoErrorKind::Timeout => QueryError::Timeout,
            ProtoErrorKind::Io(_) => QueryError::NoNameservers(err.to_string()),
            _ => QueryError::Other(err.to_string()),
        },
        _ => QueryError::Other(err.to_string()),
    }
}
