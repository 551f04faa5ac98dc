//! One batch pass over every subscription. Meant to be run by an external
//! scheduler (cron, systemd timer, cloud trigger); the trigger payload is ignored.

use anyhow::Context;

use weather_alerts::api::build_batch;
use weather_alerts::config::{load_policy_default, AppConfig};
use weather_alerts::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing("weather_alerts=info,warn");

    let cfg = AppConfig::from_env().context("loading configuration")?;
    let policy = load_policy_default().context("loading alert policy")?;
    let runner = build_batch(&cfg, policy)?;

    let summary = runner.run().await.context("batch run aborted")?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
