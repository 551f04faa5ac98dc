use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and describe the alerting series so they
    /// show up on /metrics before the first increment.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))?;

        describe_counter!("weather_fetch_total", "Weather provider lookups attempted.");
        describe_counter!(
            "weather_fetch_failures_total",
            "Lookups that failed (non-2xx or unreachable)."
        );
        describe_counter!("readings_stored_total", "Readings appended to the store.");
        describe_counter!("alerts_published_total", "Severe-weather alerts published.");
        describe_counter!("batch_runs_total", "Batch runs started.");
        describe_gauge!("batch_last_run_ts", "Unix ts when a batch run last finished.");

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
