use async_trait::async_trait;
use metrics::counter;
use reqwest::Client;
use serde::Deserialize;

use crate::config::WeatherConfig;
use crate::error::{AlertError, Result};
use crate::reading::{parse_temperature, RawObservation};
use crate::weather::WeatherSource;

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    main: Main,
    weather: Vec<Condition>,
}
#[derive(Debug, Deserialize)]
struct Main {
    // Kept as a JSON number so the decimal is built from its text.
    temp: serde_json::Number,
}
#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

/// OpenWeather "current weather" endpoint, metric units.
pub struct OpenWeatherSource {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherSource {
    pub fn new(cfg: &WeatherConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: cfg.base_url.clone(),
            api_key: cfg.api_key.clone(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Parse a success body. Only `main.temp` and `weather[0].description`
    /// are required; everything else in the payload is ignored.
    pub fn parse_current(body: &str) -> Result<RawObservation> {
        let cw: CurrentWeather = serde_json::from_str(body)
            .map_err(|e| AlertError::Parse(format!("openweather body: {e}")))?;
        let cond = cw
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| AlertError::Parse("openweather body: empty `weather` list".into()))?;
        let temperature = parse_temperature(&cw.main.temp.to_string())?;
        Ok(RawObservation::new(temperature, cond.description))
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherSource {
    async fn current(&self, location: &str) -> Result<RawObservation> {
        counter!("weather_fetch_total").increment(1);

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .inspect_err(|e| {
                tracing::warn!(error = %e, city = location, "weather provider unreachable");
                counter!("weather_fetch_failures_total").increment(1);
            })?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), city = location, "weather fetch failed");
            counter!("weather_fetch_failures_total").increment(1);
            return Err(AlertError::Fetch {
                status: status.as_u16(),
                body,
            });
        }

        Self::parse_current(&body)
    }

    fn name(&self) -> &'static str {
        "openweather"
    }
}
