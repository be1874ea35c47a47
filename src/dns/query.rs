//! The query seam between the checker and the DNS client.

use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;

use crate::config::DNS_PORT;
use crate::error_handling::QueryError;

/// Record type to ask for, chosen from the expected address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    /// IPv4 address records
    A,
    /// IPv6 address records
    Aaaa,
}

impl QueryType {
    /// The record type whose answers can contain `address`.
    pub fn for_address(address: &IpAddr) -> Self {
        match address {
            IpAddr::V4(_) => QueryType::A,
            IpAddr::V6(_) => QueryType::Aaaa,
        }
    }
}

/// Addresses returned by one nameserver, with the TTL of their RRset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    /// Resolved addresses in answer order
    pub addresses: Vec<IpAddr>,
    /// RRset TTL in seconds
    pub ttl: u32,
}

/// Issues a single query directly at one nameserver.
///
/// Implementations must not consult the system resolver configuration and
/// must not retry internally; retry policy belongs to the checker.
#[async_trait]
pub trait NameserverQuery: Send + Sync {
    /// Looks up `hostname` at `server`.
    async fn query(
        &self,
        server: SocketAddr,
        hostname: &str,
        query_type: QueryType,
    ) -> Result<Answer, QueryError>;
}

/// Parses a server list entry into the socket address to query.
///
/// Accepts a bare IP address (port 53) or a socket address such as
/// `1.2.3.4:5353` or `[2001:db8::1]:53`.
pub fn parse_server_addr(server: &str) -> Option<SocketAddr> {
    let server = server.trim();
    if let Ok(addr) = server.parse::<SocketAddr>() {
        return Some(addr);
    }
    server
        .parse::<IpAddr>()
        .ok()
        .map(|ip| SocketAddr::new(ip, DNS_PORT))
}
