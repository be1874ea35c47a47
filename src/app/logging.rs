//! Progress logging utilities.

use log::info;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Logs how many server checks have finished so far.
///
/// # Arguments
///
/// * `start_time` - When dispatching started
/// * `completed` - Checks that have produced a result
/// * `failed` - Completed checks that were not compliant
/// * `total` - Number of servers in the run
pub fn log_progress(start_time: Instant, completed: &AtomicUsize, failed: &AtomicUsize, total: usize) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let completed = completed.load(Ordering::SeqCst);
    let failed = failed.load(Ordering::SeqCst);
    let rate = if elapsed_secs > 0.0 {
        completed as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Checked {}/{} servers ({} not compliant) in {:.1} seconds (~{:.1} servers/sec)",
        completed, total, failed, elapsed_secs, rate
    );
}
