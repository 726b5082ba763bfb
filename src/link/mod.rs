//! PR-to-issue linking: reference resolution, semantic fallback, and
//! board mutations.
//!
//! The run is a linear state machine: extract references from the PR
//! text, resolve them against the board, fall back to semantic matching
//! only when nothing resolved, then apply status moves and
//! cross-references with per-issue failure isolation.

pub mod refs;
pub mod semantic;

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::context::Services;
use crate::ports::{BoardIssue, BoxError, Mutation};

pub use refs::{extract_references, IssueReference};
pub use semantic::select_best_match;

/// Fixed interval between successive board mutations.
pub(crate) const MUTATION_INTERVAL: Duration = Duration::from_secs(1);

/// Identity and text of the pull request being linked.
#[derive(Debug, Clone)]
pub struct PullRequest {
    /// Owner of the repository the PR was opened against.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Pull request number.
    pub number: u64,
    /// PR title.
    pub title: String,
    /// PR body text.
    pub body: String,
}

/// Tunables for a linking run.
#[derive(Debug, Clone)]
pub struct LinkOptions {
    /// Minimum similarity score for a semantic match. Deliberately
    /// stricter than duplicate detection: a false positive here moves
    /// the wrong issue to review.
    pub threshold: f64,
    /// Board statuses whose issues are candidates for semantic
    /// matching.
    pub active_statuses: Vec<String>,
    /// Status an issue is moved to once a PR covers it.
    pub review_status: String,
}

/// Accumulated counters and errors from a linking run.
///
/// Counters only advance on applied mutations; a dry run reports the
/// same resolution counts but zero moves. A non-empty `errors` list
/// means the run completed with warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    /// Number of issue references extracted from the PR text.
    pub direct_references_found: usize,
    /// References confirmed present on the project board.
    pub issues_linked_direct: usize,
    /// Whether the semantic fallback selected a match.
    pub semantic_match_found: bool,
    /// Issues linked via semantic matching (0 or 1).
    pub issues_linked_semantic: usize,
    /// Issues actually moved to the review status.
    pub issues_moved_to_review: usize,
    /// Human-readable descriptions of non-fatal failures.
    pub errors: Vec<String>,
}

/// Links a pull request to the board issues it addresses and moves
/// them to the review status.
///
/// Direct references always take precedence: the semantic fallback is
/// only attempted when zero extracted references resolve to board
/// members. Per-issue failures are recorded in the report and do not
/// abort the run.
///
/// # Errors
///
/// Returns an error only if the candidate fetch for semantic matching
/// fails; without a candidate pool the run cannot continue. All other
/// failures surface as strings in [`LinkReport::errors`].
pub async fn link_pull_request(
    services: &Services,
    options: &LinkOptions,
    pr: &PullRequest,
) -> Result<LinkReport, BoxError> {
    let mut report = LinkReport::default();
    info!(owner = %pr.owner, repo = %pr.repo, number = pr.number, "processing pull request");

    let mut references = refs::extract_references(&pr.title, &pr.body, &pr.owner, &pr.repo);
    report.direct_references_found = references.len();

    // Extraction order is unspecified; sort so mutation order is
    // deterministic across runs.
    references.sort_by(|a, b| {
        (a.owner.to_lowercase(), a.repo.to_lowercase(), a.number).cmp(&(
            b.owner.to_lowercase(),
            b.repo.to_lowercase(),
            b.number,
        ))
    });

    let mut matched: Vec<BoardIssue> = Vec::new();
    for reference in &references {
        debug!(
            owner = %reference.owner,
            repo = %reference.repo,
            number = reference.number,
            explicit = reference.is_explicit,
            "resolving reference"
        );
        match services
            .board
            .issue_on_board(&reference.owner, &reference.repo, reference.number)
            .await
        {
            Ok(Some(issue)) => {
                report.issues_linked_direct += 1;
                matched.push(issue);
            }
            Ok(None) => {
                info!(
                    owner = %reference.owner,
                    repo = %reference.repo,
                    number = reference.number,
                    "referenced issue not on board, excluding"
                );
            }
            Err(err) => {
                warn!(
                    owner = %reference.owner,
                    repo = %reference.repo,
                    number = reference.number,
                    error = %err,
                    "could not resolve reference, excluding"
                );
            }
        }
    }

    let mut semantic_match: Option<BoardIssue> = None;
    if matched.is_empty() {
        info!("no direct references resolved, attempting semantic matching");
        // The only fatal failure: no candidate pool, no fallback.
        let candidates = services.board.issues_by_status(&options.active_statuses).await?;
        info!(candidates = candidates.len(), "scoring candidates");

        if !candidates.is_empty() {
            let (best, score) = semantic::select_best_match(
                services.scorer.as_ref(),
                services.pacer.as_ref(),
                &pr.title,
                &pr.body,
                &candidates,
                options.threshold,
            )
            .await;

            if let Some(best) = best {
                info!(issue = best.number, score, "semantic match found");
                report.semantic_match_found = true;
                report.issues_linked_semantic = 1;
                semantic_match = Some(best.clone());
            } else {
                info!("no semantic match above threshold");
            }
        }
    }

    // Direct references auto-link on the hosting platform; only the
    // status move is needed.
    for issue in &matched {
        match services.sink.set_status(issue, &options.review_status).await {
            Ok(Mutation::Applied) => {
                info!(issue = issue.number, status = %options.review_status, "moved issue");
                report.issues_moved_to_review += 1;
            }
            Ok(Mutation::Logged) => {}
            Err(err) => {
                report.errors.push(format!(
                    "failed to move issue #{} to {}: {err}",
                    issue.number, options.review_status
                ));
            }
        }
        services.pacer.pause(MUTATION_INTERVAL).await;
    }

    if let Some(issue) = &semantic_match {
        match services.sink.set_status(issue, &options.review_status).await {
            Ok(Mutation::Applied) => {
                info!(issue = issue.number, status = %options.review_status, "moved issue");
                report.issues_moved_to_review += 1;
            }
            Ok(Mutation::Logged) => {}
            Err(err) => {
                report.errors.push(format!(
                    "failed to move issue #{} to {}: {err}",
                    issue.number, options.review_status
                ));
            }
        }

        // A semantic match has no textual reference in the PR, so the
        // cross-reference must be created explicitly. A comment failure
        // does not roll back the status move.
        match services.sink.add_cross_reference_comment(issue, &pr.owner, &pr.repo, pr.number).await
        {
            Ok(Mutation::Applied) => {
                info!(issue = issue.number, "created cross-reference to PR");
            }
            Ok(Mutation::Logged) => {}
            Err(err) => {
                report
                    .errors
                    .push(format!("failed to link PR to issue #{}: {err}", issue.number));
            }
        }
    }

    Ok(report)
}
