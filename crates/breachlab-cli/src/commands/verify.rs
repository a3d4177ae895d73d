//! Setup verification command.
//!
//! `breachlab verify` - Run the six readiness checks against a checkout
//! and exit nonzero when any of them fails.

use std::path::Path;

/// Run every stage, print the summary, and fail the process if the
/// overall verdict is red.
pub async fn verify(root: &Path) -> anyhow::Result<()> {
    let report = breachlab_verify::run(root).await;
    report.print_summary();

    if !report.passed() {
        anyhow::bail!(
            "verification failed with {} failed check(s)",
            report.failed_count()
        );
    }
    Ok(())
}
