// src/client/mod.rs
//! Interactive client: "check weather" and "register" against the service.
//! Rendering returns plain text so the CLI (and tests) only print it.

pub mod decode;

use reqwest::Client;
use serde::Deserialize;

use crate::error::{AlertError, Result};
use crate::registration::RegistrationOutcome;

pub use decode::{decode_body, inner_status, Decoded, Envelope};

/// Success body of `GET /weather`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportPayload {
    pub location: String,
    pub temperature: f64,
    pub condition: String,
    #[serde(default)]
    pub alert_sent: Option<bool>,
}

/// Failure body of every endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
    #[serde(default)]
    pub details: Option<String>,
}

/// What a weather check produced, before rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckResult {
    Report(ReportPayload),
    Rejected { status: u16, error: ErrorPayload },
}

pub struct WeatherClient {
    http: Client,
    base: String,
}

impl WeatherClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn check_weather(&self, city: &str) -> Result<CheckResult> {
        let resp = self
            .http
            .get(format!("{}/weather", self.base))
            .query(&[("city", city)])
            .send()
            .await?;
        let http_status = resp.status();
        let body = resp.text().await?;
        let status = effective_status(http_status, &body);

        if (200..300).contains(&status) {
            let d: Decoded<ReportPayload> = decode_body(&body)?;
            tracing::debug!(via = ?d.via, "decoded weather report");
            Ok(CheckResult::Report(d.value))
        } else {
            let d: Decoded<ErrorPayload> = decode_body(&body)?;
            Ok(CheckResult::Rejected {
                status,
                error: d.value,
            })
        }
    }

    pub async fn register(&self, contact: &str, city: &str) -> Result<RegistrationOutcome> {
        let resp = self
            .http
            .post(format!("{}/subscriptions", self.base))
            .json(&serde_json::json!({ "contact": contact, "location": city }))
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;

        if (200..300).contains(&effective_status(status, &body)) {
            Ok(decode_body::<RegistrationOutcome>(&body)?.value)
        } else {
            let detail = decode_body::<ErrorPayload>(&body)
                .map(|d| d.value.details.unwrap_or(d.value.error))
                .unwrap_or(body);
            Err(AlertError::Subscription(detail))
        }
    }

    /// "Check weather" action: validated input in, text to show out.
    pub async fn check_action(&self, city: &str) -> Result<String> {
        let city = city.trim();
        if city.is_empty() {
            return Err(AlertError::InvalidInput("Please enter a city.".into()));
        }
        Ok(match self.check_weather(city).await? {
            CheckResult::Report(r) => render_report(&r),
            CheckResult::Rejected { error, .. } => render_rejection(&error),
        })
    }

    /// "Register" action: subscribe first; only then fetch and show the weather.
    pub async fn register_action(&self, email: &str, city: &str) -> Result<String> {
        let (email, city) = (email.trim(), city.trim());
        if email.is_empty() || city.is_empty() {
            return Err(AlertError::InvalidInput(
                "Please enter both email and city.".into(),
            ));
        }

        self.register(email, city).await?;

        Ok(match self.check_weather(city).await? {
            CheckResult::Report(r) => format!(
                "{}\n\n📧 Confirmation email sent to:\n{}\n📨 *Please check your inbox AND spam folder to confirm subscription*",
                render_report(&r),
                email
            ),
            CheckResult::Rejected { error, .. } => render_rejection(&error),
        })
    }
}

/// The envelope's own status wins over the HTTP status around it.
fn effective_status(http: reqwest::StatusCode, body: &str) -> u16 {
    inner_status(body).unwrap_or_else(|| http.as_u16())
}

pub fn render_report(r: &ReportPayload) -> String {
    format!(
        "✅ Weather in {}:\n🌡 Temperature: {:.2}°C\n☁️ Condition: {}",
        title_case(&r.location),
        r.temperature,
        title_case(&r.condition)
    )
}

pub fn render_rejection(e: &ErrorPayload) -> String {
    format!("❌ Error: {}", e.error)
}

/// Text for a failed action.
pub fn render_failure(e: &AlertError) -> String {
    match e {
        AlertError::InvalidInput(m) => format!("Input Error: {m}"),
        AlertError::Subscription(m) => format!("Subscription Error: Could not subscribe email:\n{m}"),
        other => format!("⚠️ Failed to fetch weather:\n{other}"),
    }
}

/// Uppercase the first letter of every word, lowercase the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_matches_form_output() {
        assert_eq!(title_case("clear sky"), "Clear Sky");
        assert_eq!(title_case("new YORK"), "New York");
        assert_eq!(title_case("thunderstorm with light-rain"), "Thunderstorm With Light-Rain");
    }

    #[test]
    fn report_rendering() {
        let r = ReportPayload {
            location: "ottawa".into(),
            temperature: 36.0,
            condition: "clear sky".into(),
            alert_sent: Some(true),
        };
        assert_eq!(
            render_report(&r),
            "✅ Weather in Ottawa:\n🌡 Temperature: 36.00°C\n☁️ Condition: Clear Sky"
        );
    }

    #[test]
    fn failure_rendering() {
        assert_eq!(
            render_failure(&AlertError::InvalidInput("Please enter a city.".into())),
            "Input Error: Please enter a city."
        );
        assert!(render_failure(&AlertError::Parse("x".into())).starts_with("⚠️ Failed to fetch weather:\n"));
        assert_eq!(
            render_rejection(&ErrorPayload {
                error: "Failed to fetch weather data".into(),
                details: None
            }),
            "❌ Error: Failed to fetch weather data"
        );
    }

    #[tokio::test]
    async fn blank_inputs_never_hit_the_network() {
        // Port 9 (discard) would fail loudly if a request were attempted.
        let c = WeatherClient::new("http://127.0.0.1:9");
        assert!(matches!(c.check_action("  ").await, Err(AlertError::InvalidInput(_))));
        assert!(matches!(
            c.register_action("", "Ottawa").await,
            Err(AlertError::InvalidInput(_))
        ));
        assert!(matches!(
            c.register_action("a@x.io", " ").await,
            Err(AlertError::InvalidInput(_))
        ));
    }
}
