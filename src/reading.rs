// src/reading.rs
//! Core records: raw provider observations, normalized readings, subscriptions.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{AlertError, Result};

/// Fractional digits kept for every stored/compared temperature.
pub const TEMPERATURE_SCALE: u32 = 2;

/// What the weather adapter hands back before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    pub temperature: Decimal, // unrounded, straight from the provider's text
    pub condition: String,
}

impl RawObservation {
    pub fn new(temperature: Decimal, condition: impl Into<String>) -> Self {
        Self {
            temperature,
            condition: condition.into(),
        }
    }
}

/// One normalized observation for a location at an instant. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub location: String,
    pub timestamp: DateTime<Utc>,
    pub temperature: Decimal,
    pub condition: String,
}

impl Reading {
    /// Normalize a raw observation. Rounding happens here, before anything
    /// gets stored or compared.
    pub fn from_observation(
        location: impl Into<String>,
        raw: RawObservation,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            location: location.into(),
            timestamp: at,
            temperature: round_temperature(raw.temperature),
            condition: raw.condition,
        }
    }
}

/// A contact interested in alerts for one location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subscription {
    pub contact: String,
    #[serde(default)]
    pub location: String,
}

impl Subscription {
    pub fn new(contact: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            contact: contact.into(),
            location: location.into(),
        }
    }

    /// Location to poll; blank rows fall back to the deployment default.
    pub fn location_or<'a>(&'a self, default_city: &'a str) -> &'a str {
        let loc = self.location.trim();
        if loc.is_empty() {
            default_city
        } else {
            loc
        }
    }
}

/// Round half-up (midpoint away from zero) to exactly two fractional digits.
/// `20` becomes `20.00`, `36.004` becomes `36.00`, `-3.125` becomes `-3.13`.
pub fn round_temperature(t: Decimal) -> Decimal {
    let mut out = t.round_dp_with_strategy(TEMPERATURE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    out.rescale(TEMPERATURE_SCALE);
    out
}

/// Parse a provider number from its textual form ("36.004", "-7", "1e-3")
/// without going through binary float arithmetic.
pub fn parse_temperature(text: &str) -> Result<Decimal> {
    let t = text.trim();
    Decimal::from_str(t)
        .or_else(|_| Decimal::from_scientific(t))
        .map_err(|e| AlertError::Parse(format!("temperature '{t}' is not a number: {e}")))
}
