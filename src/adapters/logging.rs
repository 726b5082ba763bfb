//! Logging-only adapters used in dry-run mode.
//!
//! The dry-run sink runs the exact same decision path as a live run:
//! every intended mutation is logged with a "[dry run]" marker and
//! reported as [`Mutation::Logged`] so callers never count it as a
//! performed write.

use tracing::info;

use crate::ports::{BoardIssue, Mutation, MutationSink, Notifier, PortFuture};

/// Mutation sink that logs intended actions instead of performing them.
pub struct LoggingSink;

impl MutationSink for LoggingSink {
    fn set_status(&self, issue: &BoardIssue, status: &str) -> PortFuture<'_, Mutation> {
        info!(issue = issue.number, status, "[dry run] would move issue");
        Box::pin(async { Ok(Mutation::Logged) })
    }

    fn add_cross_reference_comment(
        &self,
        issue: &BoardIssue,
        pr_owner: &str,
        pr_repo: &str,
        pr_number: u64,
    ) -> PortFuture<'_, Mutation> {
        info!(
            issue = issue.number,
            pr = %format!("{pr_owner}/{pr_repo}#{pr_number}"),
            "[dry run] would cross-reference PR"
        );
        Box::pin(async { Ok(Mutation::Logged) })
    }

    fn add_comment(&self, issue: &BoardIssue, _body: &str) -> PortFuture<'_, Mutation> {
        info!(issue = issue.number, "[dry run] would comment on issue");
        Box::pin(async { Ok(Mutation::Logged) })
    }
}

/// Notifier that logs messages instead of delivering them.
///
/// Used in dry-run mode and when no webhook is configured.
pub struct LoggingNotifier;

impl Notifier for LoggingNotifier {
    fn send(&self, message: &str) -> PortFuture<'_, ()> {
        info!(content = message, "[dry run] would send notification");
        Box::pin(async { Ok(()) })
    }
}
