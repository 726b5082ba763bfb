//! `boardkeeper link-pr` command.

use crate::config::Config;
use crate::context::Services;
use crate::link::{link_pull_request, LinkOptions, LinkReport, PullRequest};

/// Execute the `link-pr` command.
///
/// # Errors
///
/// Returns an error string if configuration is incomplete, the board
/// connection fails, the run fails fatally, or the run completed with
/// warnings (so automation surfaces a non-zero exit).
pub async fn run(repo: &str, number: u64, title: &str, body: &str) -> Result<(), String> {
    let config = Config::from_env()?;
    if config.gemini_api_key.is_none() {
        return Err("GEMINI_API_KEY environment variable is required for PR linking".to_string());
    }
    let (owner, repo_name) = split_repo(repo)?;

    let services = Services::live(&config)
        .await
        .map_err(|e| format!("failed to connect to project board: {e}"))?;

    let options = LinkOptions {
        threshold: config.link_similarity,
        active_statuses: config.active_statuses.clone(),
        review_status: config.review_status.clone(),
    };
    let pr = PullRequest {
        owner,
        repo: repo_name,
        number,
        title: title.to_string(),
        body: body.to_string(),
    };

    let report = link_pull_request(&services, &options, &pr)
        .await
        .map_err(|e| format!("PR linking failed: {e}"))?;

    print_report(&pr, &options, &report);

    if report.errors.is_empty() {
        Ok(())
    } else {
        Err(format!("completed with {} warning(s)", report.errors.len()))
    }
}

fn print_report(pr: &PullRequest, options: &LinkOptions, report: &LinkReport) {
    println!("PR {}/{}#{}", pr.owner, pr.repo, pr.number);
    println!("Direct references found: {}", report.direct_references_found);
    println!("Issues linked (direct): {}", report.issues_linked_direct);
    if report.semantic_match_found {
        println!("Semantic match found: yes");
        println!("Issues linked (semantic): {}", report.issues_linked_semantic);
    } else {
        println!("Semantic match found: no");
    }
    println!("Issues moved to {}: {}", options.review_status, report.issues_moved_to_review);
    for error in &report.errors {
        eprintln!("warning: {error}");
    }
}

fn split_repo(repo: &str) -> Result<(String, String), String> {
    match repo.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(format!("invalid repository {repo:?}, expected owner/name")),
    }
}
