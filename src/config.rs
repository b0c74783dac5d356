use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::features::feedback::SignificanceConfig;
use crate::features::feedback::significance::{DEFAULT_MIN_SAMPLE_SIZE, DEFAULT_Z_CRITICAL};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{key} has an invalid value {value:?}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub pool_size: u32,
    pub busy_timeout: Duration,
    pub default_anki_budget: i32,
    pub significance: SignificanceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: "pacer.db".into(),
            bind_addr: "127.0.0.1:5000".into(),
            pool_size: 8,
            busy_timeout: Duration::from_millis(5000),
            default_anki_budget: 20,
            significance: SignificanceConfig::default(),
        }
    }
}

impl Config {
    /// Reads the process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let database_url = lookup("DATABASE_URL")
            .map(|url| normalize_database_url(&url))
            .unwrap_or(defaults.database_url);
        let bind_addr = lookup("PACER_BIND_ADDR").unwrap_or(defaults.bind_addr);
        let pool_size = parse(&lookup, "PACER_POOL_SIZE", defaults.pool_size)?;
        let busy_timeout_ms = parse(
            &lookup,
            "PACER_BUSY_TIMEOUT_MS",
            defaults.busy_timeout.as_millis() as u64,
        )?;
        let default_anki_budget = parse(
            &lookup,
            "PACER_DEFAULT_ANKI_BUDGET",
            defaults.default_anki_budget,
        )?;
        let min_sample_size = parse(&lookup, "PACER_MIN_SAMPLE_SIZE", DEFAULT_MIN_SAMPLE_SIZE)?;
        let z_critical = parse(&lookup, "PACER_Z_CRITICAL", DEFAULT_Z_CRITICAL)?;

        if pool_size == 0 {
            return Err(invalid("PACER_POOL_SIZE", pool_size, "must be at least 1"));
        }
        if default_anki_budget < 1 {
            return Err(invalid(
                "PACER_DEFAULT_ANKI_BUDGET",
                default_anki_budget,
                "must be positive",
            ));
        }
        if !(z_critical > 0.0) {
            return Err(invalid("PACER_Z_CRITICAL", z_critical, "must be positive"));
        }

        Ok(Config {
            database_url,
            bind_addr,
            pool_size,
            busy_timeout: Duration::from_millis(busy_timeout_ms),
            default_anki_budget,
            significance: SignificanceConfig {
                baseline: lookup("PACER_BASELINE_MODEL").filter(|v| !v.trim().is_empty()),
                min_sample_size,
                z_critical,
            },
        })
    }
}

/// Diesel wants a bare path; accept the `sqlite://` form too.
fn normalize_database_url(url: &str) -> String {
    url.strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url)
        .to_string()
}

fn parse<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            value: raw,
            reason: e.to_string(),
        }),
    }
}

fn invalid(key: &'static str, value: impl ToString, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, "pacer.db");
        assert_eq!(config.bind_addr, "127.0.0.1:5000");
        assert_eq!(config.default_anki_budget, 20);
        assert_eq!(config.significance.min_sample_size, 30);
        assert_eq!(config.significance.z_critical, 1.96);
        assert_eq!(config.significance.baseline, None);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "sqlite://data/site.db"),
            ("PACER_POOL_SIZE", "2"),
            ("PACER_BUSY_TIMEOUT_MS", "250"),
            ("PACER_BASELINE_MODEL", "v1.0"),
            ("PACER_Z_CRITICAL", "2.576"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "data/site.db");
        assert_eq!(config.pool_size, 2);
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert_eq!(config.significance.baseline.as_deref(), Some("v1.0"));
        assert_eq!(config.significance.z_critical, 2.576);
    }

    #[test]
    fn rejects_garbage_and_out_of_range_values() {
        assert!(matches!(
            config_from(&[("PACER_POOL_SIZE", "many")]),
            Err(ConfigError::InvalidValue { key: "PACER_POOL_SIZE", .. })
        ));
        assert!(config_from(&[("PACER_DEFAULT_ANKI_BUDGET", "0")]).is_err());
        assert!(config_from(&[("PACER_Z_CRITICAL", "-1")]).is_err());
    }
}
