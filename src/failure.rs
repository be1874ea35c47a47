//! Per-server verification outcomes.
//!
//! A server either complies, fails verification in exactly one way, or ends
//! with a [`CheckError`] when no verdict could be reached.

use std::fmt;
use std::net::IpAddr;

use strum_macros::EnumIter as EnumIterMacro;

use crate::error_handling::CheckError;

/// Why a server failed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The answer contained an address other than the expected one.
    WrongAddress {
        /// Server that answered
        server: String,
        /// First address in the answer that did not match
        observed_address: IpAddr,
    },
    /// Every address matched but the record TTL is above the allowed maximum.
    TtlExceeded {
        /// Server that answered
        server: String,
        /// TTL of the answer RRset
        observed_ttl: u32,
    },
    /// No usable answer after all attempts.
    QueryTimeout {
        /// Server that never answered
        server: String,
    },
}

impl Failure {
    /// Variant tag, used by `summarize` to pick the counter.
    pub fn kind(&self) -> FailureKind {
        match self {
            Failure::WrongAddress { .. } => FailureKind::WrongAddress,
            Failure::TtlExceeded { .. } => FailureKind::TtlExceeded,
            Failure::QueryTimeout { .. } => FailureKind::QueryTimeout,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::WrongAddress {
                server,
                observed_address,
            } => write!(f, "{server} - wrong address ({observed_address})"),
            Failure::TtlExceeded {
                server,
                observed_ttl,
            } => write!(f, "{server} - ttl too long ({observed_ttl})"),
            Failure::QueryTimeout { server } => write!(f, "{server} - query timeout"),
        }
    }
}

/// Tag of a [`Failure`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum FailureKind {
    /// [`Failure::QueryTimeout`]
    QueryTimeout,
    /// [`Failure::WrongAddress`]
    WrongAddress,
    /// [`Failure::TtlExceeded`]
    TtlExceeded,
}

impl FailureKind {
    /// Phrase used in the summary report ("had query timeouts", ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::QueryTimeout => "had query timeouts",
            FailureKind::WrongAddress => "had the wrong address",
            FailureKind::TtlExceeded => "had the wrong ttl",
        }
    }
}

/// Final state of one server's check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every address matched and the TTL is within bounds.
    Compliant,
    /// Verification failed.
    Failed(Failure),
    /// The check could not reach a verdict.
    Errored(CheckError),
}

impl Outcome {
    /// Returns `true` if the server passed verification.
    pub fn is_compliant(&self) -> bool {
        matches!(self, Outcome::Compliant)
    }

    /// The verification failure, if any.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// One server's result. Produced once per server and never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// Server entry as it appeared in the source list
    pub server: String,
    /// What the check concluded
    pub outcome: Outcome,
    /// Number of query attempts made (0 when no query was sent)
    pub attempts: usize,
}
