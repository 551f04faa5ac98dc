// src/config/app.rs
use anyhow::{anyhow, bail, Result};
use std::path::PathBuf;

use crate::ondemand::OnDemandMode;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_CITY: &str = "Ottawa";
pub const DEFAULT_READINGS_PATH: &str = "data/readings.jsonl";
pub const DEFAULT_SUBSCRIPTIONS_PATH: &str = "data/subscriptions.json";

#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub api_key: String,
    pub base_url: String,
    pub default_city: String,
}

/// Which broadcast channel alerts go out on. One per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Topic,
    Slack,
    Discord,
    Log,
}

#[derive(Debug, Clone)]
pub struct NotifyConfig {
    pub kind: ChannelKind,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    File,
    Memory,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub kind: StoreKind,
    pub readings_path: PathBuf,
    pub subscriptions_path: PathBuf,
}

/// Deployment configuration, resolved once per process from the environment
/// and handed to each component at construction.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub weather: WeatherConfig,
    pub notify: NotifyConfig,
    pub store: StoreConfig,
    pub on_demand_mode: OnDemandMode,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as `from_env` but reads through `get`, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |k: &str| get(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = var("OPENWEATHER_API_KEY")
            .ok_or_else(|| anyhow!("Missing OPENWEATHER_API_KEY env var"))?;

        let weather = WeatherConfig {
            api_key,
            base_url: var("OPENWEATHER_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            default_city: var("DEFAULT_CITY").unwrap_or_else(|| DEFAULT_CITY.to_string()),
        };

        let kind = match var("NOTIFY_CHANNEL")
            .unwrap_or_else(|| "log".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "topic" => ChannelKind::Topic,
            "slack" => ChannelKind::Slack,
            "discord" => ChannelKind::Discord,
            "log" => ChannelKind::Log,
            other => bail!("Unsupported NOTIFY_CHANNEL: {other}"),
        };
        let url = var("NOTIFY_CHANNEL_URL");
        if kind != ChannelKind::Log && url.is_none() {
            bail!("NOTIFY_CHANNEL_URL is required for channel {kind:?}");
        }

        let store_kind = match var("STORE_KIND")
            .unwrap_or_else(|| "file".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "file" => StoreKind::File,
            "memory" => StoreKind::Memory,
            other => bail!("Unsupported STORE_KIND: {other}"),
        };

        let on_demand_mode = match var("ON_DEMAND_MODE")
            .unwrap_or_else(|| "persist".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "persist" | "persist-and-alert" => OnDemandMode::PersistAndAlert,
            "read-only" | "readonly" => OnDemandMode::ReadOnly,
            other => bail!("Unsupported ON_DEMAND_MODE: {other}"),
        };

        Ok(Self {
            weather,
            notify: NotifyConfig { kind, url },
            store: StoreConfig {
                kind: store_kind,
                readings_path: var("READINGS_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_READINGS_PATH)),
                subscriptions_path: var("SUBSCRIPTIONS_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_SUBSCRIPTIONS_PATH)),
            },
            on_demand_mode,
        })
    }
}
