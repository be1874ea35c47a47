//! Error handling.
//!
//! Error types are split by where they surface:
//! - **Initialization**: logger and HTTP client setup
//! - **Query**: a single DNS query attempt (recoverable or not)
//! - **Check**: a per-server check that ended without a verdict
//! - **Source**: acquiring the server list (fatal to the run)

mod types;

// Re-export public API
pub use types::{CheckError, InitializationError, QueryError, SourceError};
