//! Live notifier posting to a Discord webhook.

use reqwest::Client;
use serde_json::json;

use crate::ports::{BoxError, Notifier, PortFuture};

/// Notifier that delivers messages through a Discord webhook URL.
pub struct DiscordNotifier {
    client: Client,
    webhook_url: String,
}

impl DiscordNotifier {
    /// Creates a notifier for the given webhook URL.
    #[must_use]
    pub fn new(webhook_url: &str) -> Self {
        Self { client: Client::new(), webhook_url: webhook_url.to_string() }
    }

    async fn post(&self, content: String) -> Result<(), BoxError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&json!({ "content": content }))
            .send()
            .await
            .map_err(|e| format!("Discord webhook request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Discord webhook error ({}): {body}", status.as_u16()).into());
        }
        Ok(())
    }
}

impl Notifier for DiscordNotifier {
    fn send(&self, message: &str) -> PortFuture<'_, ()> {
        let content = message.to_string();
        Box::pin(async move { self.post(content).await })
    }
}
