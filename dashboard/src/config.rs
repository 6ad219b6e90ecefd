use chrono::Duration;
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_SAMPLING_INTERVAL_SECS: f64 = 300.0;
pub const DEFAULT_FLEET_WINDOW_HOURS: i64 = 24;
pub const DEFAULT_MACHINE_WINDOW_HOURS: i64 = 48;
pub const DEFAULT_EXPECTED_LIFE_HOURS: f64 = 50000.0;
pub const DEFAULT_TIMELINE_LEN: usize = 20;

/// Longest accepted trailing window (ten years)
pub const MAX_WINDOW_HOURS: i64 = 24 * 3650;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub sampling_interval_secs: f64,
    pub fleet_window_hours: i64,
    pub machine_window_hours: i64,
    pub default_expected_life_hours: f64,
    pub timeline_len: usize,
}

impl EngineConfig {
    pub fn fleet_window(&self) -> Duration {
        Duration::hours(self.fleet_window_hours)
    }

    pub fn machine_window(&self) -> Duration {
        Duration::hours(self.machine_window_hours)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sampling_interval_secs: DEFAULT_SAMPLING_INTERVAL_SECS,
            fleet_window_hours: DEFAULT_FLEET_WINDOW_HOURS,
            machine_window_hours: DEFAULT_MACHINE_WINDOW_HOURS,
            default_expected_life_hours: DEFAULT_EXPECTED_LIFE_HOURS,
            timeline_len: DEFAULT_TIMELINE_LEN,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub http_addr: String,
    pub cache_tables: bool,
    pub engine: EngineConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from `lookup`. Unset, malformed or out-of-range
    /// values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = EngineConfig::default();
        let window = |h: &i64| (1..=MAX_WINDOW_HOURS).contains(h);
        let positive = |x: &f64| x.is_finite() && *x > 0.0;

        Self {
            data_dir: lookup("DATA_DIR")
                .unwrap_or_else(|| "./data".to_string())
                .into(),
            http_addr: lookup("HTTP_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            cache_tables: parse_or(&lookup, "CACHE_TABLES", false, |_| true),
            engine: EngineConfig {
                sampling_interval_secs: parse_or(
                    &lookup,
                    "SAMPLING_INTERVAL_SECS",
                    defaults.sampling_interval_secs,
                    positive,
                ),
                fleet_window_hours: parse_or(
                    &lookup,
                    "FLEET_WINDOW_HOURS",
                    defaults.fleet_window_hours,
                    window,
                ),
                machine_window_hours: parse_or(
                    &lookup,
                    "MACHINE_WINDOW_HOURS",
                    defaults.machine_window_hours,
                    window,
                ),
                default_expected_life_hours: parse_or(
                    &lookup,
                    "DEFAULT_EXPECTED_LIFE_HOURS",
                    defaults.default_expected_life_hours,
                    |x: &f64| x.is_finite(),
                ),
                timeline_len: parse_or(&lookup, "TIMELINE_LEN", defaults.timeline_len, |_| true),
            },
        }
    }
}

fn parse_or<T: FromStr + Display>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
    valid: impl Fn(&T) -> bool,
) -> T {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => value,
        _ => {
            warn!("Ignoring {}={:?}, using {}", key, raw, default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_engine_defaults() {
        let config = EngineConfig::default();

        assert_eq!(config.sampling_interval_secs, 300.0);
        assert_eq!(config.fleet_window(), Duration::hours(24));
        assert_eq!(config.machine_window(), Duration::hours(48));
        assert_eq!(config.default_expected_life_hours, 50000.0);
        assert_eq!(config.timeline_len, 20);
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_unset_uses_defaults() {
        let config = Config::from_lookup(lookup(&[]));

        assert_eq!(config.engine, EngineConfig::default());
        assert_eq!(config.http_addr, "0.0.0.0:8080");
        assert!(!config.cache_tables);
    }

    #[test]
    fn test_valid_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("SAMPLING_INTERVAL_SECS", "60"),
            ("FLEET_WINDOW_HOURS", "12"),
            ("MACHINE_WINDOW_HOURS", " 72 "),
            ("TIMELINE_LEN", "5"),
            ("CACHE_TABLES", "true"),
        ]));

        assert_eq!(config.engine.sampling_interval_secs, 60.0);
        assert_eq!(config.engine.fleet_window(), Duration::hours(12));
        assert_eq!(config.engine.machine_window_hours, 72);
        assert_eq!(config.engine.timeline_len, 5);
        assert!(config.cache_tables);
    }

    #[test]
    fn test_out_of_range_falls_back() {
        let config = Config::from_lookup(lookup(&[
            ("SAMPLING_INTERVAL_SECS", "0"),
            ("FLEET_WINDOW_HOURS", "9223372036854775807"),
            ("MACHINE_WINDOW_HOURS", "-5"),
            ("DEFAULT_EXPECTED_LIFE_HOURS", "NaN"),
        ]));

        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn test_malformed_falls_back() {
        let config = Config::from_lookup(lookup(&[
            ("SAMPLING_INTERVAL_SECS", "five minutes"),
            ("FLEET_WINDOW_HOURS", "1.5"),
            ("CACHE_TABLES", "yes"),
        ]));

        assert_eq!(config.engine, EngineConfig::default());
        assert!(!config.cache_tables);
    }
}
