//! Service context bundling all port trait objects.

use crate::adapters::live::{
    DiscordNotifier, FixedIntervalPacer, GeminiScorer, GitHubBoard, SystemClock,
};
use crate::adapters::logging::{LoggingNotifier, LoggingSink};
use crate::config::Config;
use crate::ports::{BoardReader, BoxError, Clock, MutationSink, Notifier, Pacer, PortFuture, SimilarityScorer};

/// Bundles all port trait objects into a single context.
///
/// Each field covers one external boundary. Construction wires live
/// adapters for production; tests assemble the struct directly from
/// fakes.
pub struct Services {
    /// Project board reads.
    pub board: Box<dyn BoardReader>,
    /// Project board mutations (logging-only in dry-run mode).
    pub sink: Box<dyn MutationSink>,
    /// Semantic similarity scoring.
    pub scorer: Box<dyn SimilarityScorer>,
    /// Chat notifications.
    pub notifier: Box<dyn Notifier>,
    /// Current-time source.
    pub clock: Box<dyn Clock>,
    /// Rate-limit pacing between external calls.
    pub pacer: Box<dyn Pacer>,
}

impl Services {
    /// Creates a live context from configuration.
    ///
    /// In dry-run mode the mutation sink and notifier only log intended
    /// actions. The scorer is an erroring stub unless a Gemini API key
    /// is configured; tasks that need it validate the key up front.
    ///
    /// # Errors
    ///
    /// Returns an error if the board connection (project metadata
    /// lookup) fails.
    pub async fn live(config: &Config) -> Result<Self, BoxError> {
        let board =
            GitHubBoard::connect(&config.github_token, &config.github_org, config.project_number)
                .await?;

        let sink: Box<dyn MutationSink> = if config.dry_run {
            Box::new(LoggingSink)
        } else {
            Box::new(board.clone())
        };

        let scorer: Box<dyn SimilarityScorer> = match &config.gemini_api_key {
            Some(key) => Box::new(GeminiScorer::new(key)),
            None => Box::new(UnconfiguredScorer),
        };

        let notifier: Box<dyn Notifier> = match &config.discord_webhook_url {
            Some(url) if !config.dry_run => Box::new(DiscordNotifier::new(url)),
            _ => Box::new(LoggingNotifier),
        };

        Ok(Self {
            board: Box::new(board),
            sink,
            scorer,
            notifier,
            clock: Box::new(SystemClock),
            pacer: Box::new(FixedIntervalPacer),
        })
    }
}

/// Scorer stub used when no API key is configured; every call errors
/// with a clear message.
struct UnconfiguredScorer;

impl SimilarityScorer for UnconfiguredScorer {
    fn score(&self, _: &str, _: &str, _: &str, _: &str) -> PortFuture<'_, f64> {
        Box::pin(async { Err("GEMINI_API_KEY is not set; similarity scoring unavailable".into()) })
    }
}
