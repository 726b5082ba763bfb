//! Live similarity scorer over the Gemini generateContent API.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::ports::{BoxError, PortFuture, SimilarityScorer};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

// Bodies are truncated before prompting to bound token cost.
const MAX_BODY_CHARS: usize = 500;

const SYSTEM_INSTRUCTION: &str = "You are an expert at analyzing GitHub issues and pull \
requests and determining whether they describe the same work. Consider the core problem or \
feature, the technical concepts involved, and the intended outcome. Respond with a JSON \
object containing: \"similar\" (boolean), \"similarity\" (float between 0.0 and 1.0), and \
\"reasoning\" (brief explanation). Be strict: only mark as similar if they are truly about \
the same issue or feature.";

/// Live scorer that asks a Gemini model for a similarity verdict.
pub struct GeminiScorer {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiScorer {
    /// Creates a scorer using the default model.
    #[must_use]
    pub fn new(api_key: &str) -> Self {
        Self { client: Client::new(), api_key: api_key.to_string(), model: DEFAULT_MODEL.into() }
    }

    async fn compare(&self, prompt: String) -> Result<f64, BoxError> {
        let url = format!("{GEMINI_API_URL}/{}:generateContent?key={}", self.model, self.api_key);
        let body = json!({
            "system_instruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": 0.1 },
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Gemini API request failed: {e}"))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| format!("failed to read Gemini API response: {e}"))?;

        if !status.is_success() {
            return Err(format!("Gemini API error ({}): {text}", status.as_u16()).into());
        }

        let api_response: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| format!("failed to parse Gemini API response: {e}"))?;

        let reply = api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or("no response from Gemini")?;

        parse_verdict(&reply)
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct Verdict {
    similarity: f64,
}

/// Extracts the similarity score from a model reply.
///
/// The model is asked for plain JSON but may wrap it in markdown
/// fences or prose; parse the first JSON object found.
fn parse_verdict(reply: &str) -> Result<f64, BoxError> {
    let start = reply.find('{').ok_or("no JSON object in model reply")?;
    let end = reply.rfind('}').ok_or("no JSON object in model reply")?;
    if end < start {
        return Err("no JSON object in model reply".into());
    }

    let verdict: Verdict = serde_json::from_str(&reply[start..=end])
        .map_err(|e| format!("malformed similarity verdict: {e}"))?;
    Ok(verdict.similarity.clamp(0.0, 1.0))
}

fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

fn comparison_prompt(a_title: &str, a_body: &str, b_title: &str, b_body: &str) -> String {
    format!(
        "Compare these two items and determine if they describe the same work:\n\n\
         Item A: {a_title}\n{}\n\n\
         Item B: {b_title}\n{}\n\n\
         Are these about the same issue or feature? Respond in JSON format.",
        truncate_body(a_body),
        truncate_body(b_body),
    )
}

impl SimilarityScorer for GeminiScorer {
    fn score(
        &self,
        a_title: &str,
        a_body: &str,
        b_title: &str,
        b_body: &str,
    ) -> PortFuture<'_, f64> {
        let prompt = comparison_prompt(a_title, a_body, b_title, b_body);
        Box::pin(async move { self.compare(prompt).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_json_verdict_is_parsed() {
        let score =
            parse_verdict(r#"{"similar": true, "similarity": 0.93, "reasoning": "same bug"}"#)
                .unwrap();
        assert!((score - 0.93).abs() < f64::EPSILON);
    }

    #[test]
    fn fenced_json_verdict_is_parsed() {
        let reply = "```json\n{\"similar\": false, \"similarity\": 0.12}\n```";
        let score = parse_verdict(reply).unwrap();
        assert!((score - 0.12).abs() < f64::EPSILON);
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        let score = parse_verdict(r#"{"similarity": 1.7}"#).unwrap();
        assert!((score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn prose_without_json_is_an_error() {
        assert!(parse_verdict("these look pretty similar to me").is_err());
    }

    #[test]
    fn short_bodies_are_kept_whole() {
        assert_eq!(truncate_body("  short body  "), "short body");
    }

    #[test]
    fn long_bodies_are_truncated_with_ellipsis() {
        let body = "x".repeat(800);
        let truncated = truncate_body(&body);
        assert_eq!(truncated.chars().count(), MAX_BODY_CHARS + 3);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn prompt_includes_both_titles() {
        let prompt = comparison_prompt("Fix login", "a", "Login broken", "b");
        assert!(prompt.contains("Fix login"));
        assert!(prompt.contains("Login broken"));
    }
}
