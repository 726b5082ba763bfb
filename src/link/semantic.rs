//! Semantic match selection over board candidates.

use std::time::Duration;

use tracing::warn;

use crate::ports::{BoardIssue, Pacer, SimilarityScorer};

/// Fixed interval between successive scorer calls.
pub(crate) const SCORE_INTERVAL: Duration = Duration::from_millis(200);

/// Selects the board issue most similar to the PR text, if any scores
/// at or above `threshold`.
///
/// Candidates are scored one at a time against a pseudo-issue built
/// from the PR title and body. A candidate becomes the new best only
/// if its score is strictly greater than the current best and at least
/// `threshold`, so ties break first-seen-wins and below-threshold
/// scores never raise the bar. Per-candidate scoring failures are
/// logged and skipped; they do not abort the scan.
pub async fn select_best_match<'a>(
    scorer: &dyn SimilarityScorer,
    pacer: &dyn Pacer,
    pr_title: &str,
    pr_body: &str,
    candidates: &'a [BoardIssue],
    threshold: f64,
) -> (Option<&'a BoardIssue>, f64) {
    let mut best: Option<&BoardIssue> = None;
    let mut best_score = 0.0_f64;

    for candidate in candidates {
        let score =
            match scorer.score(pr_title, pr_body, &candidate.title, &candidate.body).await {
                Ok(score) => score,
                Err(err) => {
                    warn!(issue = candidate.number, error = %err, "similarity comparison failed, skipping candidate");
                    continue;
                }
            };

        if score > best_score && score >= threshold {
            best_score = score;
            best = Some(candidate);
        }

        pacer.pause(SCORE_INTERVAL).await;
    }

    (best, best_score)
}
