// src/notify/mod.rs
//! One broadcast channel per deployment. Fan-out to individual contacts is the
//! channel's job; this code only publishes and registers contacts.

pub mod discord;
pub mod log;
pub mod slack;
pub mod topic;

use std::sync::Arc;

use anyhow::{anyhow, Result as AnyResult};

use crate::config::{ChannelKind, NotifyConfig};
use crate::error::Result;
use crate::reading::Reading;

pub use discord::DiscordChannel;
pub use log::LogChannel;
pub use slack::SlackChannel;
pub use topic::TopicChannel;

/// Subject + body ready for any channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub subject: String,
    pub body: String,
}

impl AlertMessage {
    pub fn for_reading(r: &Reading) -> Self {
        Self {
            subject: format!("🚨 Weather Alert for {}", r.location),
            body: format!(
                "⚠️ Severe Weather Alert for {}!\nCondition: {}, Temp: {}°C",
                r.location, r.condition, r.temperature
            ),
        }
    }
}

#[async_trait::async_trait]
pub trait BroadcastChannel: Send + Sync {
    async fn publish(&self, subject: &str, body: &str) -> Result<()>;
    /// Register a contact with the channel's own delivery mechanism.
    async fn subscribe(&self, contact: &str) -> Result<()>;
    fn name(&self) -> &'static str;
}

pub type DynChannel = Arc<dyn BroadcastChannel>;

pub fn build_channel(cfg: &NotifyConfig) -> AnyResult<DynChannel> {
    let url = || {
        cfg.url
            .clone()
            .ok_or_else(|| anyhow!("channel {:?} needs NOTIFY_CHANNEL_URL", cfg.kind))
    };
    let ch: DynChannel = match cfg.kind {
        ChannelKind::Topic => Arc::new(TopicChannel::new(url()?)),
        ChannelKind::Slack => Arc::new(SlackChannel::new(url()?)),
        ChannelKind::Discord => Arc::new(DiscordChannel::new(url()?)),
        ChannelKind::Log => Arc::new(LogChannel),
    };
    Ok(ch)
}
