//! # Alert Policy
//! Pure, testable logic that maps a normalized `Reading` → `AlertDecision`.
//! No I/O.
//!
//! Policy: severe when the temperature is strictly above the high threshold,
//! strictly below the low threshold, or the lowercased condition contains any
//! configured keyword. Every severe evaluation alerts (no cooldown).

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::reading::{round_temperature, Reading};

/// Keywords shipped with the binary when no policy file overrides them.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "thunderstorm",
    "storm",
    "snow",
    "heavy snow",
    "heavy rain",
    "extreme",
    "tornado",
    "hurricane",
    "hail",
    "sleet",
];

/// Keywords seen in one deployment whose breadth still needs product sign-off.
/// Kept when configured, but logged on every load.
pub const PENDING_CONFIRMATION: &[&str] = &["few clouds"];

#[derive(Debug, Clone, PartialEq)]
pub struct AlertPolicy {
    high: Decimal,
    low: Decimal,
    keywords: Vec<String>,
}

/// Why a reading was considered severe.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trigger {
    AboveHigh { threshold: Decimal },
    BelowLow { threshold: Decimal },
    Keyword { keyword: String },
}

/// Transient result of one evaluation; never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDecision {
    pub severe: bool,
    pub triggers: Vec<Trigger>,
    pub reading: Reading,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self::new(
            Decimal::new(3500, 2),
            Decimal::new(-1000, 2),
            DEFAULT_KEYWORDS.iter().copied(),
        )
    }
}

impl AlertPolicy {
    /// Thresholds are rounded like readings; keywords are trimmed, lowercased
    /// and deduplicated, blanks dropped.
    pub fn new<I, S>(high: Decimal, low: Decimal, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            high: round_temperature(high),
            low: round_temperature(low),
            keywords: normalize_keywords(keywords),
        }
    }

    pub fn high(&self) -> Decimal {
        self.high
    }

    pub fn low(&self) -> Decimal {
        self.low
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Configured keywords that are still awaiting confirmation.
    pub fn pending_keywords(&self, pending: &[String]) -> Vec<String> {
        self.keywords
            .iter()
            .filter(|k| pending.iter().any(|p| p.eq_ignore_ascii_case(k)))
            .cloned()
            .collect()
    }

    pub fn evaluate(&self, reading: &Reading) -> AlertDecision {
        let mut triggers = Vec::new();

        if reading.temperature > self.high {
            triggers.push(Trigger::AboveHigh {
                threshold: self.high,
            });
        }
        if reading.temperature < self.low {
            triggers.push(Trigger::BelowLow {
                threshold: self.low,
            });
        }

        let cond = reading.condition.to_lowercase();
        for kw in self.keywords.iter().filter(|k| cond.contains(k.as_str())) {
            triggers.push(Trigger::Keyword {
                keyword: kw.clone(),
            });
        }

        AlertDecision {
            severe: !triggers.is_empty(),
            triggers,
            reading: reading.clone(),
        }
    }

    pub fn is_severe(&self, reading: &Reading) -> bool {
        self.evaluate(reading).severe
    }
}

pub(crate) fn normalize_keywords<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = BTreeSet::new();
    for it in items {
        let t = it.as_ref().trim().to_lowercase();
        if !t.is_empty() {
            set.insert(t);
        }
    }
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::RawObservation;
    use chrono::Utc;
    use std::str::FromStr;

    fn reading(temp: &str, cond: &str) -> Reading {
        Reading::from_observation(
            "Ottawa",
            RawObservation::new(Decimal::from_str(temp).unwrap(), cond),
            Utc::now(),
        )
    }

    #[test]
    fn high_threshold_is_exclusive() {
        let p = AlertPolicy::default();
        assert!(!p.is_severe(&reading("35.00", "clear sky")));
        assert!(p.is_severe(&reading("35.01", "clear sky")));
        // 35.004 rounds to 35.00 before the comparison.
        assert!(!p.is_severe(&reading("35.004", "clear sky")));
        assert!(p.is_severe(&reading("35.005", "clear sky")));
    }

    #[test]
    fn low_threshold_is_exclusive() {
        let p = AlertPolicy::default();
        assert!(!p.is_severe(&reading("-10.00", "clear sky")));
        assert!(p.is_severe(&reading("-10.01", "clear sky")));
        assert!(!p.is_severe(&reading("-10.004", "clear sky")));
    }

    #[test]
    fn keywords_match_case_insensitive_substrings() {
        let p = AlertPolicy::default();
        for cond in [
            "Thunderstorm with light rain",
            "HEAVY SNOW",
            "light snow",
            "ragged thunderstorm",
            "very heavy rain",
            "Hail",
            "freezing sleet showers",
        ] {
            assert!(p.is_severe(&reading("5.0", cond)), "{cond} should be severe");
        }
    }

    #[test]
    fn mild_conditions_are_not_severe() {
        let p = AlertPolicy::default();
        for cond in ["light rain", "clear sky", "few clouds", "overcast clouds", "mist"] {
            assert!(!p.is_severe(&reading("20.0", cond)), "{cond} should be calm");
        }
    }

    #[test]
    fn triggers_explain_the_decision() {
        let p = AlertPolicy::default();
        let d = p.evaluate(&reading("36.5", "heavy snow"));
        assert!(d.severe);
        assert!(d.triggers.contains(&Trigger::AboveHigh {
            threshold: Decimal::new(3500, 2)
        }));
        // "snow" and "heavy snow" both match.
        let kws: Vec<_> = d
            .triggers
            .iter()
            .filter_map(|t| match t {
                Trigger::Keyword { keyword } => Some(keyword.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(kws, vec!["heavy snow", "snow"]);
    }

    #[test]
    fn injected_keywords_are_normalized() {
        let p = AlertPolicy::new(
            Decimal::new(30, 0),
            Decimal::new(0, 0),
            [" Few Clouds ", "", "few clouds", "Dust"],
        );
        assert_eq!(p.keywords(), &["dust".to_string(), "few clouds".to_string()]);
        assert_eq!(p.high().to_string(), "30.00");
        assert!(p.is_severe(&reading("20.0", "few clouds")));

        let pending: Vec<String> = PENDING_CONFIRMATION.iter().map(|s| s.to_string()).collect();
        assert_eq!(p.pending_keywords(&pending), vec!["few clouds".to_string()]);
    }
}
