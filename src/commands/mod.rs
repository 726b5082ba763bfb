//! Command dispatch and handlers.

pub mod link_pr;
pub mod triage;

use crate::cli::Command;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub async fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::LinkPr { repo, number, title, body } => {
            link_pr::run(repo, *number, title, body).await
        }
        Command::TriageStale => triage::run().await,
    }
}
