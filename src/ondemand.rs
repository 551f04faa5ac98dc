//! # On-Demand check
//! One location in, one normalized reading out. Two deployable behaviours of
//! the same component, selected by `OnDemandMode`.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::weather::resolve_location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnDemandMode {
    /// Store the reading and alert when severe.
    #[default]
    PersistAndAlert,
    /// Return the reading only.
    ReadOnly,
}

/// 200 body of `GET /weather`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub location: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub temperature: Decimal,
    pub condition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_sent: Option<bool>,
}

pub struct OnDemand {
    pipeline: Pipeline,
    mode: OnDemandMode,
    default_city: String,
}

impl OnDemand {
    pub fn new(pipeline: Pipeline, mode: OnDemandMode, default_city: impl Into<String>) -> Self {
        Self {
            pipeline,
            mode,
            default_city: default_city.into(),
        }
    }

    pub fn mode(&self) -> OnDemandMode {
        self.mode
    }

    pub async fn check(&self, city: Option<&str>) -> Result<WeatherReport> {
        let location = resolve_location(city, &self.default_city);
        let reading = self.pipeline.observe(&location).await?;

        let alert_sent = match self.mode {
            OnDemandMode::ReadOnly => None,
            OnDemandMode::PersistAndAlert => {
                Some(self.pipeline.record_and_alert(reading.clone()).await?.alert_sent)
            }
        };

        Ok(WeatherReport {
            location: reading.location,
            temperature: reading.temperature,
            condition: reading.condition,
            alert_sent,
        })
    }
}
