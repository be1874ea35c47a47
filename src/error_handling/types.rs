//! Error type definitions.
//!
//! This module defines the error types used throughout the application.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Errors raised by a single DNS query attempt against one nameserver.
///
/// The first three variants are recoverable: the attempt is retried and, once
/// the attempt budget is spent, the server is reported as timed out. Anything
/// else ends the check immediately.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The nameserver did not answer within the query timeout.
    #[error("query timed out")]
    Timeout,

    /// The nameserver answered without any record of the requested type.
    #[error("no answer")]
    NoAnswer,

    /// The nameserver could not be reached or refused to serve the query.
    #[error("no reachable nameservers: {0}")]
    NoNameservers(String),

    /// Any other failure of the query layer.
    #[error("{0}")]
    Other(String),
}

impl QueryError {
    /// Returns `true` for conditions that are worth another attempt.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            QueryError::Timeout | QueryError::NoAnswer | QueryError::NoNameservers(_)
        )
    }
}

/// A per-server check that could not reach a verdict.
///
/// These are reported separately from verification failures so that they are
/// never mistaken for timeouts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// The server entry is not an IP address or socket address.
    #[error("{server} - invalid server address")]
    InvalidServer {
        /// The offending entry
        server: String,
    },

    /// The query layer failed in a way that is not retried.
    #[error("{server} - query error ({source})")]
    Query {
        /// Server the query was sent to
        server: String,
        /// Underlying query error
        source: QueryError,
    },

    /// The task running the check panicked.
    #[error("{server} - check aborted ({message})")]
    Panicked {
        /// Server whose check panicked
        server: String,
        /// Panic or join error description
        message: String,
    },
}

/// Errors acquiring the server list.
///
/// Any of these is fatal to the run: no server is checked.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The source looked like a URL but could not be parsed as one.
    #[error("Invalid server list URL {url}: {source}")]
    InvalidUrl {
        /// The source string
        url: String,
        /// Parse error
        source: url::ParseError,
    },

    /// The HTTP request for the server list failed.
    #[error("Failed to fetch server list: {0}")]
    Http(#[from] ReqwestError),

    /// The server list endpoint answered with a non-success status.
    #[error("Server list request to {url} returned HTTP {status}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Reading the server list from a file or stdin failed.
    #[error("Failed to read server list from {path}: {source}")]
    Io {
        /// File path, or `-` for stdin
        path: String,
        /// I/O error
        source: std::io::Error,
    },

    /// The source contained no server entries.
    #[error("Server list from {0} is empty")]
    Empty(String),
}
