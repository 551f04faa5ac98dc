// src/weather/mod.rs
pub mod openweather;

use crate::error::Result;
use crate::reading::RawObservation;

pub use openweather::OpenWeatherSource;

/// One outbound lookup for one location. Fail-fast: no retries, no caching.
#[async_trait::async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, location: &str) -> Result<RawObservation>;
    fn name(&self) -> &'static str;
}

/// Blank/absent locations fall back to the deployment default.
pub fn resolve_location(requested: Option<&str>, default_city: &str) -> String {
    requested
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default_city)
        .to_string()
}
