use reqwest::Client;
use serde::Serialize;

use super::BroadcastChannel;
use crate::error::{AlertError, Result};

/// HTTP pub/sub topic: the topic service owns the subscriber list and delivers
/// each published message to every confirmed subscriber.
///
/// * `POST {base}/messages`      `{"subject": .., "message": ..}`
/// * `POST {base}/subscriptions` `{"protocol": "email", "endpoint": ..}`
pub struct TopicChannel {
    base: String,
    client: Client,
}

#[derive(Serialize)]
struct PublishReq<'a> {
    subject: &'a str,
    message: &'a str,
}

#[derive(Serialize)]
struct SubscribeReq<'a> {
    protocol: &'a str,
    endpoint: &'a str,
}

impl TopicChannel {
    pub fn new(base: String) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn url(&self, tail: &str) -> String {
        format!("{}/{}", self.base, tail)
    }
}

#[async_trait::async_trait]
impl BroadcastChannel for TopicChannel {
    async fn publish(&self, subject: &str, body: &str) -> Result<()> {
        self.client
            .post(self.url("messages"))
            .json(&PublishReq {
                subject,
                message: body,
            })
            .send()
            .await
            .map_err(|e| AlertError::Notify(format!("topic publish: {e}")))?
            .error_for_status()
            .map_err(|e| AlertError::Notify(format!("topic publish non-2xx: {e}")))?;
        Ok(())
    }

    async fn subscribe(&self, contact: &str) -> Result<()> {
        let rsp = self
            .client
            .post(self.url("subscriptions"))
            .json(&SubscribeReq {
                protocol: "email",
                endpoint: contact,
            })
            .send()
            .await
            .map_err(|e| AlertError::Subscription(format!("topic subscribe: {e}")))?;

        let status = rsp.status();
        if !status.is_success() {
            let detail = rsp.text().await.unwrap_or_default();
            return Err(AlertError::Subscription(format!(
                "topic rejected {contact} with HTTP {}: {detail}",
                status.as_u16()
            )));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "topic"
    }
}
