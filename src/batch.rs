//! # Batch Orchestrator
//! One pass over the subscriber directory, strictly sequential.
//!
//! An upstream non-success status skips that subscription (nothing written,
//! nothing evaluated). Any other failure aborts the run.

use metrics::{counter, gauge};
use serde::Serialize;

use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::store::DynSubscriberDirectory;

pub const NO_SUBSCRIPTIONS: &str = "No user subscriptions found.";
pub const COMPLETED: &str = "Automated weather check completed.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub message: String,
    pub subscriptions: usize,
    pub skipped: usize,
    pub stored: usize,
    pub alerts_sent: usize,
}

impl BatchSummary {
    fn empty() -> Self {
        Self {
            message: NO_SUBSCRIPTIONS.to_string(),
            subscriptions: 0,
            skipped: 0,
            stored: 0,
            alerts_sent: 0,
        }
    }
}

pub struct BatchRunner {
    pipeline: Pipeline,
    directory: DynSubscriberDirectory,
    default_city: String,
}

impl BatchRunner {
    pub fn new(
        pipeline: Pipeline,
        directory: DynSubscriberDirectory,
        default_city: impl Into<String>,
    ) -> Self {
        Self {
            pipeline,
            directory,
            default_city: default_city.into(),
        }
    }

    pub async fn run(&self) -> Result<BatchSummary> {
        counter!("batch_runs_total").increment(1);

        let subs = self.directory.all().await?;
        if subs.is_empty() {
            tracing::info!("no subscriptions; nothing to check");
            return Ok(BatchSummary::empty());
        }

        let mut summary = BatchSummary {
            message: COMPLETED.to_string(),
            subscriptions: subs.len(),
            skipped: 0,
            stored: 0,
            alerts_sent: 0,
        };

        for sub in &subs {
            let city = sub.location_or(&self.default_city);

            let reading = match self.pipeline.observe(city).await {
                Ok(r) => r,
                Err(e) if e.is_fetch_failure() => {
                    tracing::warn!(city, contact = %sub.contact, error = %e, "skipping subscription");
                    summary.skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let outcome = self.pipeline.record_and_alert(reading).await?;
            summary.stored += 1;
            if outcome.alert_sent {
                summary.alerts_sent += 1;
            }
        }

        gauge!("batch_last_run_ts").set(chrono::Utc::now().timestamp() as f64);
        tracing::info!(
            subscriptions = summary.subscriptions,
            skipped = summary.skipped,
            stored = summary.stored,
            alerts = summary.alerts_sent,
            "batch run finished"
        );
        Ok(summary)
    }
}
