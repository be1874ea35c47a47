//! DNS queries against individual nameservers.
//!
//! This module provides:
//! - The [`NameserverQuery`] trait the checker queries through
//! - [`HickoryQuery`], the `hickory-resolver` implementation that targets one
//!   nameserver and bypasses the system resolver configuration
//! - Server entry parsing

mod hickory;
mod query;

// Re-export public API
pub use hickory::HickoryQuery;
pub use query::{parse_server_addr, Answer, NameserverQuery, QueryType};
