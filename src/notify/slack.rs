use reqwest::Client;

use super::BroadcastChannel;
use crate::error::{AlertError, Result};

/// Slack incoming webhook. Everyone in the Slack channel sees the alert;
/// membership is managed in Slack, so `subscribe` is refused.
pub struct SlackChannel {
    webhook_url: String,
    client: Client,
}

impl SlackChannel {
    pub fn new(url: String) -> Self {
        Self {
            webhook_url: url,
            client: Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl BroadcastChannel for SlackChannel {
    async fn publish(&self, subject: &str, body: &str) -> Result<()> {
        let text = format!("*{subject}*\n{body}");
        let payload = serde_json::json!({ "text": text });

        self.client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AlertError::Notify(format!("slack post: {e}")))?
            .error_for_status()
            .map_err(|e| AlertError::Notify(format!("slack non-2xx: {e}")))?;
        Ok(())
    }

    async fn subscribe(&self, contact: &str) -> Result<()> {
        Err(AlertError::Subscription(format!(
            "slack channel cannot enrol {contact}; invite them in Slack"
        )))
    }

    fn name(&self) -> &'static str {
        "slack"
    }
}
