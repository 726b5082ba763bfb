//! Live adapters backed by real external services.

pub mod clock;
pub mod discord;
pub mod gemini;
pub mod github;
pub mod pacing;

pub use clock::SystemClock;
pub use discord::DiscordNotifier;
pub use gemini::GeminiScorer;
pub use github::GitHubBoard;
pub use pacing::FixedIntervalPacer;
