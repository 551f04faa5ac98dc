// src/config/policy.rs
use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};

use crate::policy::{normalize_keywords, AlertPolicy, DEFAULT_KEYWORDS, PENDING_CONFIRMATION};

const ENV_PATH: &str = "ALERT_POLICY_PATH";

#[derive(Debug, serde::Deserialize)]
struct PolicyFile {
    #[serde(default)]
    high_c: Option<Decimal>,
    #[serde(default)]
    low_c: Option<Decimal>,
    #[serde(default)]
    keywords: Option<Vec<String>>,
    #[serde(default)]
    pending_confirmation: Option<Vec<String>>,
}

/// Load the alert policy from an explicit path. Supports TOML or JSON formats.
pub fn load_policy_from(path: &Path) -> Result<AlertPolicy> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading alert policy from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_policy(&content, ext.as_str())
}

/// Load the alert policy using env var + fallbacks:
/// 1) $ALERT_POLICY_PATH
/// 2) config/alert_policy.toml
/// 3) config/alert_policy.json
/// 4) built-in defaults
pub fn load_policy_default() -> Result<AlertPolicy> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_policy_from(&pb);
        } else {
            return Err(anyhow!("ALERT_POLICY_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/alert_policy.toml");
    if toml_p.exists() {
        return load_policy_from(&toml_p);
    }
    let json_p = PathBuf::from("config/alert_policy.json");
    if json_p.exists() {
        return load_policy_from(&json_p);
    }
    Ok(AlertPolicy::default())
}

fn parse_policy(s: &str, hint_ext: &str) -> Result<AlertPolicy> {
    let file: PolicyFile = if hint_ext == "json" {
        serde_json::from_str(s).context("parsing alert policy json")?
    } else if hint_ext == "toml" {
        toml::from_str(s).context("parsing alert policy toml")?
    } else if let Ok(v) = toml::from_str(s) {
        v
    } else {
        serde_json::from_str(s).map_err(|_| anyhow!("unsupported alert policy format"))?
    };
    Ok(build_policy(file))
}

fn build_policy(file: PolicyFile) -> AlertPolicy {
    let base = AlertPolicy::default();
    let policy = match file.keywords {
        Some(kws) => AlertPolicy::new(
            file.high_c.unwrap_or(base.high()),
            file.low_c.unwrap_or(base.low()),
            kws,
        ),
        None => AlertPolicy::new(
            file.high_c.unwrap_or(base.high()),
            file.low_c.unwrap_or(base.low()),
            DEFAULT_KEYWORDS.iter().copied(),
        ),
    };

    let pending = match file.pending_confirmation {
        Some(p) => normalize_keywords(p),
        None => normalize_keywords(PENDING_CONFIRMATION.iter().copied()),
    };
    for kw in policy.pending_keywords(&pending) {
        tracing::warn!(
            keyword = %kw,
            "alert keyword is pending product-owner confirmation; it broadens alerts considerably"
        );
    }
    if policy.low() >= policy.high() {
        tracing::warn!(
            low = %policy.low(),
            high = %policy.high(),
            "alert policy low threshold is not below the high threshold"
        );
    }

    policy
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn toml_overrides_thresholds_and_keywords() {
        let p = parse_policy(
            r#"
high_c = 30
low_c = -5.5
keywords = [" Tornado ", "", "few clouds", "tornado"]
"#,
            "toml",
        )
        .unwrap();
        assert_eq!(p.high().to_string(), "30.00");
        assert_eq!(p.low().to_string(), "-5.50");
        assert_eq!(p.keywords(), &["few clouds".to_string(), "tornado".to_string()]);
    }

    #[test]
    fn json_without_keywords_keeps_defaults() {
        let p = parse_policy(r#"{"high_c": 40}"#, "json").unwrap();
        assert_eq!(p.high().to_string(), "40.00");
        assert_eq!(p.low().to_string(), "-10.00");
        assert_eq!(p.keywords().len(), DEFAULT_KEYWORDS.len());
    }

    #[test]
    fn unhinted_content_is_sniffed() {
        let p = parse_policy(r#"keywords = ["dust"]"#, "").unwrap();
        assert_eq!(p.keywords(), &["dust".to_string()]);
        let p = parse_policy(r#"{"keywords": ["smoke"]}"#, "").unwrap();
        assert_eq!(p.keywords(), &["smoke".to_string()]);
        assert!(parse_policy("keywords: [", "").is_err());
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();

        env::remove_var(ENV_PATH);

        // Nothing on disk -> built-in policy
        let p = load_policy_default().unwrap();
        assert_eq!(p, AlertPolicy::default());

        // Fallback TOML in ./config/
        let cfg_dir = tmp.path().join("config");
        fs::create_dir_all(&cfg_dir).unwrap();
        fs::write(cfg_dir.join("alert_policy.toml"), r#"keywords = ["hail"]"#).unwrap();
        let pt = load_policy_default().unwrap();
        assert_eq!(pt.keywords(), &["hail".to_string()]);

        // Env wins
        let p_env = tmp.path().join("policy.json");
        fs::write(&p_env, r#"{"keywords": ["sleet"]}"#).unwrap();
        env::set_var(ENV_PATH, p_env.display().to_string());
        let pe = load_policy_default().unwrap();
        assert_eq!(pe.keywords(), &["sleet".to_string()]);

        env::set_var(ENV_PATH, tmp.path().join("missing.toml").display().to_string());
        assert!(load_policy_default().is_err());
        env::remove_var(ENV_PATH);

        env::set_current_dir(&old).unwrap();
    }
}
