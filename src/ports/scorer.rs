//! Semantic similarity scorer port.

use super::PortFuture;

/// Scores how similar two pieces of issue-like text are.
///
/// Abstracting the scorer keeps the selection logic testable without a
/// live model behind it.
pub trait SimilarityScorer: Send + Sync {
    /// Compares two (title, body) text pairs and returns a similarity
    /// score in `[0.0, 1.0]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the comparison fails (network, auth,
    /// rate-limit, malformed response).
    fn score(
        &self,
        a_title: &str,
        a_body: &str,
        b_title: &str,
        b_body: &str,
    ) -> PortFuture<'_, f64>;
}
