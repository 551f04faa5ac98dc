//! # Weather check pipeline
//! fetch → normalize → store → evaluate → publish, for one location.
//! Shared by the batch run and the on-demand endpoint; each owns its handles.

use std::sync::Arc;

use chrono::Utc;
use metrics::counter;

use crate::error::Result;
use crate::notify::{AlertMessage, DynChannel};
use crate::policy::{AlertDecision, AlertPolicy};
use crate::reading::Reading;
use crate::store::DynReadingStore;
use crate::weather::WeatherSource;

/// Result of storing + evaluating one reading.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub decision: AlertDecision,
    pub alert_sent: bool,
}

#[derive(Clone)]
pub struct Pipeline {
    source: Arc<dyn WeatherSource>,
    store: DynReadingStore,
    channel: DynChannel,
    policy: Arc<AlertPolicy>,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn WeatherSource>,
        store: DynReadingStore,
        channel: DynChannel,
        policy: AlertPolicy,
    ) -> Self {
        Self {
            source,
            store,
            channel,
            policy: Arc::new(policy),
        }
    }

    pub fn policy(&self) -> &AlertPolicy {
        &self.policy
    }

    /// One provider lookup, normalized. Nothing is written.
    pub async fn observe(&self, location: &str) -> Result<Reading> {
        let raw = self.source.current(location).await?;
        Ok(Reading::from_observation(location, raw, Utc::now()))
    }

    /// Append the reading, evaluate it, publish once if severe.
    pub async fn record_and_alert(&self, reading: Reading) -> Result<CheckOutcome> {
        self.store.append(&reading).await?;
        counter!("readings_stored_total").increment(1);

        let decision = self.policy.evaluate(&reading);
        let mut alert_sent = false;
        if decision.severe {
            let msg = AlertMessage::for_reading(&reading);
            self.channel.publish(&msg.subject, &msg.body).await?;
            counter!("alerts_published_total").increment(1);
            alert_sent = true;
            tracing::info!(
                city = %reading.location,
                temperature = %reading.temperature,
                condition = %reading.condition,
                channel = self.channel.name(),
                "severe weather alert published"
            );
        } else {
            tracing::debug!(city = %reading.location, "reading within limits");
        }

        Ok(CheckOutcome {
            decision,
            alert_sent,
        })
    }
}
