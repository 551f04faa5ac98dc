use super::BroadcastChannel;
use crate::error::Result;

/// Writes alerts to the tracing log. Used when no real channel is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogChannel;

#[async_trait::async_trait]
impl BroadcastChannel for LogChannel {
    async fn publish(&self, subject: &str, body: &str) -> Result<()> {
        tracing::info!(target: "alerts", subject, body, "alert published (log channel)");
        Ok(())
    }

    async fn subscribe(&self, contact: &str) -> Result<()> {
        tracing::info!(target: "alerts", contact, "contact subscribed (log channel)");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
