//! `boardkeeper triage-stale` command.

use crate::config::Config;
use crate::context::Services;
use crate::triage::{sweep_stale, TriageOptions, TriageReport};

/// Execute the `triage-stale` command.
///
/// # Errors
///
/// Returns an error string if configuration is incomplete, the board
/// connection or issue fetch fails, or the sweep completed with
/// warnings.
pub async fn run() -> Result<(), String> {
    let config = Config::from_env()?;

    let services = Services::live(&config)
        .await
        .map_err(|e| format!("failed to connect to project board: {e}"))?;

    let options = TriageOptions {
        target_statuses: config.target_statuses.clone(),
        stale_status: config.stale_status.clone(),
        threshold_days: config.staleness_threshold_days,
    };

    let report = sweep_stale(&services, &options)
        .await
        .map_err(|e| format!("stale triage failed: {e}"))?;

    print_report(&options, &report);

    if report.errors.is_empty() {
        Ok(())
    } else {
        Err(format!("completed with {} warning(s)", report.errors.len()))
    }
}

fn print_report(options: &TriageOptions, report: &TriageReport) {
    println!("Issues analyzed: {}", report.issues_analyzed);
    println!("Stale issues found: {}", report.stale_found);
    println!("Issues moved to {}: {}", options.stale_status, report.issues_moved);
    for error in &report.errors {
        eprintln!("warning: {error}");
    }
}
