//! Exit code policy for a completed run.

use crate::aggregate::Summary;
use crate::config::FailOn;

/// Exit code when the run completed and the policy was not triggered.
pub const EXIT_OK: i32 = 0;
/// Exit code for a fatal error (bad configuration, unreadable server list).
pub const EXIT_FATAL: i32 = 1;
/// Exit code when `--fail-on` was triggered.
pub const EXIT_POLICY_TRIGGERED: i32 = 2;

/// Maps a summary to a process exit code under the `--fail-on` policy.
///
/// Errored checks count as failures. An empty run never triggers the policy.
pub fn evaluate_exit_code(fail_on: &FailOn, pct_threshold: u8, summary: &Summary) -> i32 {
    match fail_on {
        FailOn::Never => EXIT_OK,
        FailOn::AnyFailure => {
            if summary.failed() > 0 {
                EXIT_POLICY_TRIGGERED
            } else {
                EXIT_OK
            }
        }
        FailOn::PctGreaterThan => {
            if summary.failed_pct() > f64::from(pct_threshold) {
                EXIT_POLICY_TRIGGERED
            } else {
                EXIT_OK
            }
        }
    }
}
