//! Summary report printed at the end of a run.

use std::fmt::Write as _;

use strum::IntoEnumIterator;

use crate::aggregate::Summary;
use crate::failure::FailureKind;

/// Formats the summary block.
///
/// The first line counts every server that did not pass; one indented line
/// follows per failure kind, plus a query error line when any check errored.
pub fn format_summary(summary: &Summary) -> String {
    let total = summary.total;
    let mut out = format!("{} out of {} failed:\n", summary.failed(), total);

    for kind in FailureKind::iter() {
        let count = summary.count(kind);
        let _ = writeln!(
            out,
            "\t{} out of {} ({:.6}%) {}",
            count,
            total,
            summary.percent_of_total(count),
            kind.as_str()
        );
    }

    if summary.errors > 0 {
        let _ = writeln!(
            out,
            "\t{} out of {} ({:.6}%) had query errors",
            summary.errors,
            total,
            summary.error_pct()
        );
    }

    out
}

/// Prints the summary block on stdout.
pub fn print_summary(summary: &Summary) {
    print!("{}", format_summary(summary));
}
