//! Environment-driven configuration.

/// Runtime configuration for the agent, loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// GitHub API token.
    pub github_token: String,
    /// GitHub organization that owns the project board.
    pub github_org: String,
    /// Project (v2) number within the organization.
    pub project_number: u64,
    /// Gemini API key; only required for tasks that score similarity.
    pub gemini_api_key: Option<String>,
    /// Discord webhook URL; messages are logged when unset.
    pub discord_webhook_url: Option<String>,
    /// When set, board mutations are logged instead of performed.
    pub dry_run: bool,
    /// Minimum similarity for linking a PR to an issue. Stricter than
    /// duplicate detection on purpose: a false positive silently moves
    /// the wrong issue to review.
    pub link_similarity: f64,
    /// Statuses whose issues are candidates for semantic PR matching.
    pub active_statuses: Vec<String>,
    /// Status an issue moves to once a PR covers it.
    pub review_status: String,
    /// Statuses analyzed by the stale triage sweep.
    pub target_statuses: Vec<String>,
    /// Status stale issues move to.
    pub stale_status: String,
    /// Days without updates before an issue counts as stale.
    pub staleness_threshold_days: u32,
}

impl Config {
    /// Loads configuration from the process environment, reading a
    /// `.env` file first if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error string if a required variable is missing or a
    /// value fails to parse.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an injectable variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error string if a required variable is missing or a
    /// value fails to parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let required = |key: &str| -> Result<String, String> {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| format!("{key} environment variable is required"))
        };

        let project_number = required("PROJECT_NUMBER")?
            .parse::<u64>()
            .map_err(|_| "PROJECT_NUMBER must be a valid integer".to_string())?;

        let mut config = Self {
            github_token: required("GITHUB_TOKEN")?,
            github_org: required("GITHUB_ORG")?,
            project_number,
            gemini_api_key: lookup("GEMINI_API_KEY").filter(|v| !v.is_empty()),
            discord_webhook_url: lookup("DISCORD_WEBHOOK_URL").filter(|v| !v.is_empty()),
            dry_run: lookup("DRY_RUN").as_deref() == Some("true"),
            link_similarity: 0.95,
            active_statuses: vec!["In Progress".to_string(), "Sprint Backlog".to_string()],
            review_status: "PR Review".to_string(),
            target_statuses: vec![
                "Inbox".to_string(),
                "Backlog".to_string(),
                "Sprint Backlog".to_string(),
                "In Progress".to_string(),
                "PR Review".to_string(),
            ],
            stale_status: "Stuck / Dead Issue".to_string(),
            staleness_threshold_days: 180,
        };

        if let Some(value) = lookup("LINK_SIMILARITY") {
            config.link_similarity = value
                .parse::<f64>()
                .map_err(|_| "LINK_SIMILARITY must be a valid float".to_string())?;
        }
        if let Some(value) = lookup("STALENESS_THRESHOLD_DAYS") {
            config.staleness_threshold_days = value
                .parse::<u32>()
                .map_err(|_| "STALENESS_THRESHOLD_DAYS must be a valid integer".to_string())?;
        }
        if let Some(value) = lookup("REVIEW_STATUS") {
            if !value.is_empty() {
                config.review_status = value;
            }
        }
        if let Some(value) = lookup("STALE_STATUS") {
            if !value.is_empty() {
                config.stale_status = value;
            }
        }
        if let Some(value) = lookup("ACTIVE_STATUSES") {
            let statuses = split_statuses(&value);
            if !statuses.is_empty() {
                config.active_statuses = statuses;
            }
        }
        if let Some(value) = lookup("TARGET_STATUSES") {
            let statuses = split_statuses(&value);
            if !statuses.is_empty() {
                config.target_statuses = statuses;
            }
        }

        Ok(config)
    }
}

fn split_statuses(value: &str) -> Vec<String> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}
