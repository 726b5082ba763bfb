//! Integration tests for top-level CLI behavior.

use std::process::Command;

fn run_boardkeeper(args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_boardkeeper");
    // Clear the environment and run from a neutral directory so the
    // harness's real GITHUB_TOKEN or a stray .env file cannot leak in.
    Command::new(bin)
        .args(args)
        .env_clear()
        .current_dir(std::env::temp_dir())
        .output()
        .expect("failed to run boardkeeper binary")
}

#[test]
fn no_subcommand_shows_usage() {
    let output = run_boardkeeper(&[]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("Usage") || stderr.contains("usage"));
}

#[test]
fn invalid_subcommand_exits_with_error() {
    let output = run_boardkeeper(&["nonsense"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn help_lists_subcommands() {
    let output = run_boardkeeper(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let combined = format!("{stdout}{stderr}");
    assert!(combined.contains("link-pr"));
    assert!(combined.contains("triage-stale"));
}

#[test]
fn link_pr_without_repo_shows_error() {
    let output = run_boardkeeper(&["link-pr", "--number", "1"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("--repo") || stderr.contains("PR_REPO"));
}

#[test]
fn link_pr_without_credentials_fails() {
    let output = run_boardkeeper(&["link-pr", "--repo", "acme/app", "--number", "1"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("GITHUB_TOKEN") || stderr.contains("GEMINI_API_KEY"));
}

#[test]
fn triage_without_credentials_fails() {
    let output = run_boardkeeper(&["triage-stale"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("GITHUB_TOKEN"));
}
