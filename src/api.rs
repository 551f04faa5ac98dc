use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::batch::BatchRunner;
use crate::config::AppConfig;
use crate::error::AlertError;
use crate::notify::{build_channel, DynChannel};
use crate::ondemand::{OnDemand, WeatherReport};
use crate::pipeline::Pipeline;
use crate::policy::AlertPolicy;
use crate::registration::{Registrar, RegistrationOutcome, RegistrationRequest};
use crate::store::{build_stores, DynSubscriberDirectory};
use crate::weather::{OpenWeatherSource, WeatherSource};

#[derive(Clone)]
pub struct AppState {
    ondemand: Arc<OnDemand>,
    registrar: Arc<Registrar>,
}

impl AppState {
    pub fn new(ondemand: OnDemand, registrar: Registrar) -> Self {
        Self {
            ondemand: Arc::new(ondemand),
            registrar: Arc::new(registrar),
        }
    }

    /// Wire every handle from configuration. Nothing here is process-global.
    pub fn from_config(cfg: &AppConfig, policy: AlertPolicy) -> anyhow::Result<Self> {
        let (pipeline, channel, directory) = build_pipeline(cfg, policy)?;
        Ok(Self::new(
            OnDemand::new(pipeline, cfg.on_demand_mode, &cfg.weather.default_city),
            Registrar::new(channel, directory),
        ))
    }
}

/// Batch runner with the same wiring as the service.
pub fn build_batch(cfg: &AppConfig, policy: AlertPolicy) -> anyhow::Result<BatchRunner> {
    let (pipeline, _, directory) = build_pipeline(cfg, policy)?;
    Ok(BatchRunner::new(pipeline, directory, &cfg.weather.default_city))
}

fn build_pipeline(
    cfg: &AppConfig,
    policy: AlertPolicy,
) -> anyhow::Result<(Pipeline, DynChannel, DynSubscriberDirectory)> {
    let source: Arc<dyn WeatherSource> = Arc::new(OpenWeatherSource::new(&cfg.weather));
    let (readings, directory) = build_stores(&cfg.store);
    let channel = build_channel(&cfg.notify)?;
    let pipeline = Pipeline::new(source, readings, channel.clone(), policy);
    Ok((pipeline, channel, directory))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/weather", get(weather))
        .route("/subscriptions", post(subscribe))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct WeatherQuery {
    #[serde(default)]
    city: Option<String>,
}

/// Non-200 body shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
}

struct ApiError {
    status: StatusCode,
    error: &'static str,
    details: String,
}

impl ApiError {
    fn from_alert(e: AlertError, fallback: &'static str) -> Self {
        match e {
            AlertError::Fetch { body, .. } => Self {
                status: StatusCode::BAD_REQUEST,
                error: "Failed to fetch weather data",
                details: body,
            },
            AlertError::InvalidInput(m) => Self {
                status: StatusCode::BAD_REQUEST,
                error: "Invalid input",
                details: m,
            },
            AlertError::Subscription(m) => Self {
                status: StatusCode::BAD_GATEWAY,
                error: "Could not subscribe contact",
                details: m,
            },
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: fallback,
                details: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.error.to_string(),
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

async fn weather(
    State(state): State<AppState>,
    Query(q): Query<WeatherQuery>,
) -> Result<Json<WeatherReport>, ApiError> {
    match state.ondemand.check(q.city.as_deref()).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            tracing::warn!(error = %e, city = ?q.city, "on-demand check failed");
            Err(ApiError::from_alert(e, "Weather check failed"))
        }
    }
}

async fn subscribe(
    State(state): State<AppState>,
    Json(req): Json<RegistrationRequest>,
) -> Result<(StatusCode, Json<RegistrationOutcome>), ApiError> {
    let outcome = state
        .registrar
        .register(&req.contact, &req.location)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "registration failed");
            ApiError::from_alert(e, "Registration failed")
        })?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome)))
}
