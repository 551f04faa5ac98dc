use reqwest::Client;
use serde::Serialize;

use super::BroadcastChannel;
use crate::error::{AlertError, Result};

#[derive(Clone)]
pub struct DiscordChannel {
    webhook: String,
    client: Client,
}

impl DiscordChannel {
    pub fn new(webhook: String) -> Self {
        Self {
            webhook,
            client: Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl BroadcastChannel for DiscordChannel {
    async fn publish(&self, subject: &str, body: &str) -> Result<()> {
        let payload = DiscordWebhookPayload::embed(subject, body);

        let rsp = self
            .client
            .post(&self.webhook)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AlertError::Notify(format!("Discord webhook request failed: {e}")))?;
        rsp.error_for_status_ref()
            .map_err(|e| AlertError::Notify(format!("Discord webhook HTTP error: {e}")))?;
        Ok(())
    }

    async fn subscribe(&self, contact: &str) -> Result<()> {
        Err(AlertError::Subscription(format!(
            "discord webhook cannot enrol {contact}"
        )))
    }

    fn name(&self) -> &'static str {
        "discord"
    }
}

#[derive(Serialize)]
struct DiscordEmbed {
    title: String,
    description: String,
}

#[derive(Serialize)]
struct DiscordWebhookPayload {
    content: Option<String>,
    embeds: Vec<DiscordEmbed>,
}

impl DiscordWebhookPayload {
    fn embed(title: &str, description: &str) -> Self {
        Self {
            content: None,
            embeds: vec![DiscordEmbed {
                title: title.to_string(),
                description: description.to_string(),
            }],
        }
    }
}
