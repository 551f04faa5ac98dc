//! Weather alert service — Binary Entrypoint
//! Boots the Axum HTTP server: on-demand weather endpoint and registration.

use shuttle_axum::ShuttleAxum;

use weather_alerts::config::{load_policy_default, AppConfig};
use weather_alerts::metrics::Metrics;
use weather_alerts::{create_router, init_tracing, AppState};

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing("weather_alerts=info,warn");

    let cfg = AppConfig::from_env()?;
    let policy = load_policy_default()?;
    tracing::info!(
        mode = ?cfg.on_demand_mode,
        channel = ?cfg.notify.kind,
        store = ?cfg.store.kind,
        keywords = policy.keywords().len(),
        "weather alert service starting"
    );

    let state = AppState::from_config(&cfg, policy)?;
    let mut router = create_router(state);

    if std::env::var("METRICS_ROUTE").is_ok_and(|v| v == "1") {
        let metrics = Metrics::init()?;
        router = router.merge(metrics.router());
    }

    Ok(router.into())
}
