//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `boardkeeper`.
#[derive(Debug, Parser)]
#[command(name = "boardkeeper", version, about = "Keep a GitHub Projects board tidy")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Link a pull request to the board issues it addresses.
    ///
    /// Arguments default to the environment variables delivered by a
    /// repository_dispatch workflow event.
    LinkPr {
        /// Repository the PR was opened against, as `owner/name`.
        #[arg(long, env = "PR_REPO")]
        repo: String,
        /// Pull request number.
        #[arg(long, env = "PR_NUMBER")]
        number: u64,
        /// Pull request title.
        #[arg(long, env = "PR_TITLE", default_value = "")]
        title: String,
        /// Pull request body.
        #[arg(long, env = "PR_BODY", default_value = "")]
        body: String,
    },
    /// Move board issues with no recent activity to the dead-issue
    /// status and notify the team channel.
    TriageStale,
}
