//! Main application modules.
//!
//! This module provides progress logging, shutdown of background tasks,
//! the summary report and the exit code policy used by the binary.

pub mod exit;
pub mod logging;
pub mod report;
pub mod shutdown;

// Re-export public API
pub use exit::{evaluate_exit_code, EXIT_FATAL, EXIT_OK, EXIT_POLICY_TRIGGERED};
pub use logging::log_progress;
pub use report::{format_summary, print_summary};
pub use shutdown::shutdown_gracefully;
