//! Project board port for reading issues and applying mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PortFuture;

/// An issue retrieved from the project board, with the project metadata
/// needed for matching and mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardIssue {
    /// Issue number within its repository.
    pub number: u64,
    /// The issue title.
    pub title: String,
    /// The issue body text.
    pub body: String,
    /// Web URL of the issue.
    pub url: String,
    /// When the issue was last updated.
    pub updated_at: DateTime<Utc>,
    /// Logins of the assigned users.
    pub assignees: Vec<String>,
    /// Project item node id. Empty means the issue is a repository
    /// issue only and is not a valid mutation target.
    pub item_id: String,
    /// Current value of the board's Status field.
    pub status: String,
    /// Repository node id, needed to address the issue for comments.
    pub repository_id: String,
    /// Node id of the board's Status field.
    pub status_field_id: String,
}

impl BoardIssue {
    /// Returns `true` if this issue is a confirmed board member and may
    /// be mutated.
    #[must_use]
    pub fn on_board(&self) -> bool {
        !self.item_id.is_empty()
    }
}

/// Outcome of a single board mutation call.
///
/// A logging-only sink (dry run) reports [`Mutation::Logged`] so callers
/// can run identical decision logic without counting a write that never
/// happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// The mutation was performed against the live board.
    Applied,
    /// The mutation was only logged (dry run).
    Logged,
}

/// Reads issues from the project board.
pub trait BoardReader: Send + Sync {
    /// Fetches an issue by repository and number, returning it only if
    /// it is a member of the project board. `Ok(None)` means the issue
    /// does not exist or is not on the board.
    ///
    /// # Errors
    ///
    /// Returns an error if the board cannot be queried.
    fn issue_on_board(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> PortFuture<'_, Option<BoardIssue>>;

    /// Lists board issues whose Status matches any of the given values.
    ///
    /// # Errors
    ///
    /// Returns an error if the board cannot be queried.
    fn issues_by_status(&self, statuses: &[String]) -> PortFuture<'_, Vec<BoardIssue>>;
}

/// Applies mutations to the project board.
///
/// Implementations either write to the live board or, in dry-run mode,
/// log the intended action and return [`Mutation::Logged`].
pub trait MutationSink: Send + Sync {
    /// Sets the board Status field of an issue to the named value.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails.
    fn set_status(&self, issue: &BoardIssue, status: &str) -> PortFuture<'_, Mutation>;

    /// Creates a cross-reference from the issue to a pull request by
    /// leaving a minimal comment, so the PR shows in the issue timeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails.
    fn add_cross_reference_comment(
        &self,
        issue: &BoardIssue,
        pr_owner: &str,
        pr_repo: &str,
        pr_number: u64,
    ) -> PortFuture<'_, Mutation>;

    /// Adds a free-form comment to an issue.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails.
    fn add_comment(&self, issue: &BoardIssue, body: &str) -> PortFuture<'_, Mutation>;
}
