// tests/openweather_http.rs
//
// OpenWeather adapter against a throwaway axum server standing in for the provider.

mod common;

use std::collections::HashMap;

use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use serde_json::json;

use common::spawn_server;
use weather_alerts::config::WeatherConfig;
use weather_alerts::error::AlertError;
use weather_alerts::weather::{OpenWeatherSource, WeatherSource};

async fn fake_provider(
    Query(q): Query<HashMap<String, String>>,
) -> (StatusCode, Json<serde_json::Value>) {
    if q.get("appid").map(String::as_str) != Some("test-key") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"cod": 401, "message": "Invalid API key"})),
        );
    }
    if q.get("units").map(String::as_str) != Some("metric") {
        return (StatusCode::BAD_REQUEST, Json(json!({"message": "units"})));
    }
    match q.get("q").map(String::as_str) {
        Some("Ottawa") => (
            StatusCode::OK,
            Json(json!({
                "weather": [{"id": 800, "main": "Clear", "description": "clear sky"}],
                "main": {"temp": 36.004, "humidity": 30},
                "name": "Ottawa"
            })),
        ),
        Some("St. John's") => (
            StatusCode::OK,
            Json(json!({
                "weather": [{"description": "heavy snow"}],
                "main": {"temp": -4}
            })),
        ),
        Some("Odd") => (StatusCode::OK, Json(json!({"main": {}}))),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"cod": "404", "message": "city not found"})),
        ),
    }
}

fn config(base: &str, key: &str) -> WeatherConfig {
    WeatherConfig {
        api_key: key.to_string(),
        base_url: format!("{base}/data/2.5/weather"),
        default_city: "Ottawa".to_string(),
    }
}

async fn provider_url() -> String {
    spawn_server(Router::new().route("/data/2.5/weather", get(fake_provider))).await
}

#[tokio::test]
async fn success_body_becomes_raw_observation() {
    let base = provider_url().await;
    let src = OpenWeatherSource::new(&config(&base, "test-key"));

    let obs = src.current("Ottawa").await.expect("ottawa");
    assert_eq!(obs.temperature.to_string(), "36.004");
    assert_eq!(obs.condition, "clear sky");

    // Query values are URL-encoded.
    let obs = src.current("St. John's").await.expect("st john's");
    assert_eq!(obs.temperature.to_string(), "-4");
    assert_eq!(obs.condition, "heavy snow");
}

#[tokio::test]
async fn non_success_carries_status_and_body() {
    let base = provider_url().await;
    let src = OpenWeatherSource::new(&config(&base, "test-key"));
    match src.current("Atlantis").await {
        Err(AlertError::Fetch { status, body }) => {
            assert_eq!(status, 404);
            assert!(body.contains("city not found"));
        }
        other => panic!("expected fetch failure, got {other:?}"),
    }

    let bad_key = OpenWeatherSource::new(&config(&base, "wrong"));
    assert!(matches!(
        bad_key.current("Ottawa").await,
        Err(AlertError::Fetch { status: 401, .. })
    ));
}

#[tokio::test]
async fn unexpected_shape_is_a_parse_failure() {
    let base = provider_url().await;
    let src = OpenWeatherSource::new(&config(&base, "test-key"));
    assert!(matches!(src.current("Odd").await, Err(AlertError::Parse(_))));
}

#[tokio::test]
async fn unreachable_provider_is_a_transport_error() {
    // Bind then drop so the port is (almost certainly) closed.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let src = OpenWeatherSource::new(&config(&format!("http://{addr}"), "test-key"));
    let err = src.current("Ottawa").await.unwrap_err();
    assert!(matches!(err, AlertError::Transport(_)));
    assert!(!err.is_fetch_failure());
}
