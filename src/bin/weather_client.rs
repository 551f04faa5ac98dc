//! Interactive client: check the weather for a city, or register for alerts.

use argh::FromArgs;

use weather_alerts::client::{render_failure, WeatherClient};
use weather_alerts::init_tracing;

/// Weather alert client
#[derive(FromArgs, Debug)]
struct ClientArgs {
    /// service base URL (default: $WEATHER_API_URL or http://127.0.0.1:8000)
    #[argh(option)]
    api: Option<String>,

    #[argh(subcommand)]
    action: Action,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Action {
    Check(CheckArgs),
    Register(RegisterArgs),
}

/// check current weather only
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "check")]
struct CheckArgs {
    /// city to look up
    #[argh(option, default = "String::new()")]
    city: String,
}

/// register an email for alerts and show the current weather
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "register")]
struct RegisterArgs {
    /// email address to subscribe
    #[argh(option, default = "String::new()")]
    email: String,

    /// city to receive alerts for
    #[argh(option, default = "String::new()")]
    city: String,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    init_tracing("warn");

    let args: ClientArgs = argh::from_env();
    let base = args
        .api
        .or_else(|| std::env::var("WEATHER_API_URL").ok())
        .unwrap_or_else(|| "http://127.0.0.1:8000".to_string());
    let client = WeatherClient::new(base);

    let result = match &args.action {
        Action::Check(a) => client.check_action(&a.city).await,
        Action::Register(a) => client.register_action(&a.email, &a.city).await,
    };

    match result {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("{}", render_failure(&e));
            std::process::exit(1);
        }
    }
}
