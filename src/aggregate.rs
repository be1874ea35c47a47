//! Tallying of check results.

use crate::failure::{CheckResult, FailureKind, Outcome};

/// Counts of each outcome over one run.
///
/// `compliant + timeouts + wrong_addresses + ttl_exceeded + errors == total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Number of servers checked
    pub total: usize,
    /// Servers that passed verification
    pub compliant: usize,
    /// Servers reported as [`crate::failure::Failure::QueryTimeout`]
    pub timeouts: usize,
    /// Servers reported as [`crate::failure::Failure::WrongAddress`]
    pub wrong_addresses: usize,
    /// Servers reported as [`crate::failure::Failure::TtlExceeded`]
    pub ttl_exceeded: usize,
    /// Servers whose check ended in a [`crate::error_handling::CheckError`]
    pub errors: usize,
}

impl Summary {
    /// Servers that did not pass, verification failures and errors together.
    pub fn failed(&self) -> usize {
        self.total - self.compliant
    }

    /// Count of one failure kind.
    pub fn count(&self, kind: FailureKind) -> usize {
        match kind {
            FailureKind::QueryTimeout => self.timeouts,
            FailureKind::WrongAddress => self.wrong_addresses,
            FailureKind::TtlExceeded => self.ttl_exceeded,
        }
    }

    /// `count` as a percentage of `total`; 0.0 for an empty run.
    #[allow(clippy::cast_precision_loss)]
    pub fn percent_of_total(&self, count: usize) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        count as f64 / self.total as f64 * 100.0
    }

    /// Percentage of servers whose check errored.
    pub fn error_pct(&self) -> f64 {
        self.percent_of_total(self.errors)
    }

    /// Percentage of servers that did not pass.
    pub fn failed_pct(&self) -> f64 {
        self.percent_of_total(self.failed())
    }
}

/// Folds a complete result set into a [`Summary`].
pub fn summarize(results: &[CheckResult]) -> Summary {
    results.iter().fold(
        Summary {
            total: results.len(),
            ..Summary::default()
        },
        |mut summary, result| {
            match &result.outcome {
                Outcome::Compliant => summary.compliant += 1,
                Outcome::Failed(failure) => match failure.kind() {
                    FailureKind::QueryTimeout => summary.timeouts += 1,
                    FailureKind::WrongAddress => summary.wrong_addresses += 1,
                    FailureKind::TtlExceeded => summary.ttl_exceeded += 1,
                },
                Outcome::Errored(_) => summary.errors += 1,
            }
            summary
        },
    )
}
