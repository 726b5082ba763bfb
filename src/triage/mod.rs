//! Stale issue triage: sweep inactive board issues into a dead-issue
//! status.

use std::time::Duration;

use tracing::{info, warn};

use crate::context::Services;
use crate::ports::{BoxError, Mutation};

/// Fixed interval between successive board mutations during a sweep.
pub(crate) const TRIAGE_INTERVAL: Duration = Duration::from_secs(2);

/// Tunables for a triage sweep.
#[derive(Debug, Clone)]
pub struct TriageOptions {
    /// Board statuses whose issues are analyzed for staleness.
    pub target_statuses: Vec<String>,
    /// Status stale issues are moved to.
    pub stale_status: String,
    /// Days without an update before an issue counts as stale.
    pub threshold_days: u32,
}

/// Accumulated counters and errors from a triage sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriageReport {
    /// Issues fetched and analyzed.
    pub issues_analyzed: usize,
    /// Issues whose last update exceeded the staleness threshold.
    pub stale_found: usize,
    /// Issues actually moved to the stale status.
    pub issues_moved: usize,
    /// Human-readable descriptions of non-fatal failures.
    pub errors: Vec<String>,
}

/// Moves issues with no recent activity to the stale status, leaving an
/// explanatory comment on each, and sends a one-line summary to the
/// notifier.
///
/// Per-issue failures are recorded and do not abort the sweep. A failed
/// comment skips the move for that issue, so no issue lands in the
/// stale column without an explanation.
///
/// # Errors
///
/// Returns an error if the issue fetch fails; nothing can be analyzed
/// without it.
pub async fn sweep_stale(
    services: &Services,
    options: &TriageOptions,
) -> Result<TriageReport, BoxError> {
    let issues = services.board.issues_by_status(&options.target_statuses).await?;
    let mut report = TriageReport { issues_analyzed: issues.len(), ..TriageReport::default() };

    let now = services.clock.now();
    let cutoff = now - chrono::Duration::days(i64::from(options.threshold_days));
    let stale: Vec<_> = issues.into_iter().filter(|issue| issue.updated_at < cutoff).collect();
    report.stale_found = stale.len();
    info!(
        analyzed = report.issues_analyzed,
        stale = report.stale_found,
        threshold_days = options.threshold_days,
        "staleness analysis complete"
    );

    for issue in &stale {
        let days_inactive = (now - issue.updated_at).num_days();
        let comment = stale_comment(days_inactive, options.threshold_days, &options.stale_status);

        if let Err(err) = services.sink.add_comment(issue, &comment).await {
            warn!(issue = issue.number, error = %err, "could not comment on stale issue");
            report
                .errors
                .push(format!("failed to comment on issue #{}: {err}", issue.number));
            continue;
        }

        match services.sink.set_status(issue, &options.stale_status).await {
            Ok(Mutation::Applied) => {
                info!(issue = issue.number, status = %options.stale_status, "moved stale issue");
                report.issues_moved += 1;
            }
            Ok(Mutation::Logged) => {}
            Err(err) => {
                report.errors.push(format!(
                    "failed to move issue #{} to {}: {err}",
                    issue.number, options.stale_status
                ));
            }
        }

        services.pacer.pause(TRIAGE_INTERVAL).await;
    }

    let summary = format!(
        "Stale triage: {} analyzed, {} stale, {} moved to {}.",
        report.issues_analyzed, report.stale_found, report.issues_moved, options.stale_status
    );
    if let Err(err) = services.notifier.send(&summary).await {
        report.errors.push(format!("failed to send triage summary: {err}"));
    }

    Ok(report)
}

fn stale_comment(days_inactive: i64, threshold_days: u32, stale_status: &str) -> String {
    format!(
        "This issue has been automatically moved to **{stale_status}**.\n\n\
         **Reason:** no activity for {days_inactive} days (threshold: {threshold_days} days).\n\n\
         If it is still relevant, comment with an update and move it back \
         to an appropriate status."
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::ports::pacing::NoPacing;
    use crate::ports::{
        BoardIssue, BoardReader, Clock, MutationSink, Notifier, PortFuture, SimilarityScorer,
    };

    fn issue(number: u64, updated: chrono::DateTime<Utc>) -> BoardIssue {
        BoardIssue {
            number,
            title: format!("Issue {number}"),
            body: String::new(),
            url: format!("https://github.com/acme/app/issues/{number}"),
            updated_at: updated,
            assignees: vec![],
            item_id: format!("item-{number}"),
            status: "Backlog".to_string(),
            repository_id: "repo-1".to_string(),
            status_field_id: "field-1".to_string(),
        }
    }

    struct StaticBoard {
        issues: Vec<BoardIssue>,
    }

    impl BoardReader for StaticBoard {
        fn issue_on_board(&self, _: &str, _: &str, _: u64) -> PortFuture<'_, Option<BoardIssue>> {
            Box::pin(async { Ok(None) })
        }

        fn issues_by_status(&self, _statuses: &[String]) -> PortFuture<'_, Vec<BoardIssue>> {
            let issues = self.issues.clone();
            Box::pin(async move { Ok(issues) })
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink {
        moves: Arc<Mutex<Vec<u64>>>,
        comments: Arc<Mutex<Vec<u64>>>,
    }

    impl MutationSink for RecordingSink {
        fn set_status(&self, issue: &BoardIssue, _status: &str) -> PortFuture<'_, Mutation> {
            self.moves.lock().unwrap().push(issue.number);
            Box::pin(async { Ok(Mutation::Applied) })
        }

        fn add_cross_reference_comment(
            &self,
            _issue: &BoardIssue,
            _pr_owner: &str,
            _pr_repo: &str,
            _pr_number: u64,
        ) -> PortFuture<'_, Mutation> {
            Box::pin(async { Ok(Mutation::Applied) })
        }

        fn add_comment(&self, issue: &BoardIssue, _body: &str) -> PortFuture<'_, Mutation> {
            self.comments.lock().unwrap().push(issue.number);
            Box::pin(async { Ok(Mutation::Applied) })
        }
    }

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        messages: Arc<Mutex<Vec<String>>>,
    }

    impl Notifier for RecordingNotifier {
        fn send(&self, message: &str) -> PortFuture<'_, ()> {
            self.messages.lock().unwrap().push(message.to_string());
            Box::pin(async { Ok(()) })
        }
    }

    struct FixedClock(chrono::DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> chrono::DateTime<Utc> {
            self.0
        }
    }

    struct UnusedScorer;

    impl SimilarityScorer for UnusedScorer {
        fn score(&self, _: &str, _: &str, _: &str, _: &str) -> PortFuture<'_, f64> {
            Box::pin(async { Err(BoxError::from("scorer should not be called")) })
        }
    }

    fn services(
        issues: Vec<BoardIssue>,
        sink: RecordingSink,
        notifier: RecordingNotifier,
        now: chrono::DateTime<Utc>,
    ) -> Services {
        Services {
            board: Box::new(StaticBoard { issues }),
            sink: Box::new(sink),
            scorer: Box::new(UnusedScorer),
            notifier: Box::new(notifier),
            clock: Box::new(FixedClock(now)),
            pacer: Box::new(NoPacing),
        }
    }

    fn options() -> TriageOptions {
        TriageOptions {
            target_statuses: vec!["Backlog".to_string()],
            stale_status: "Stuck / Dead Issue".to_string(),
            threshold_days: 180,
        }
    }

    #[tokio::test]
    async fn stale_issues_are_commented_and_moved() {
        let now = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
        let old = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let fresh = Utc.with_ymd_and_hms(2026, 7, 20, 12, 0, 0).unwrap();
        let sink = RecordingSink::default();
        let moves = Arc::clone(&sink.moves);
        let comments = Arc::clone(&sink.comments);
        let svcs = services(vec![issue(1, old), issue(2, fresh)], sink, RecordingNotifier::default(), now);

        let report = sweep_stale(&svcs, &options()).await.unwrap();

        assert_eq!(report.issues_analyzed, 2);
        assert_eq!(report.stale_found, 1);
        assert_eq!(report.issues_moved, 1);
        assert!(report.errors.is_empty());
        assert_eq!(*moves.lock().unwrap(), vec![1]);
        assert_eq!(*comments.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn summary_is_sent_even_when_nothing_is_stale() {
        let now = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
        let notifier = RecordingNotifier::default();
        let messages = Arc::clone(&notifier.messages);
        let svcs = services(vec![issue(1, now)], RecordingSink::default(), notifier, now);

        let report = sweep_stale(&svcs, &options()).await.unwrap();

        assert_eq!(report.stale_found, 0);
        let sent = messages.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("0 stale"));
    }

    #[test]
    fn stale_comment_names_threshold_and_status() {
        let comment = stale_comment(200, 180, "Stuck / Dead Issue");
        assert!(comment.contains("200 days"));
        assert!(comment.contains("180 days"));
        assert!(comment.contains("Stuck / Dead Issue"));
    }
}
