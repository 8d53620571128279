use std::env;
use std::time::Duration;

use wikiracer_core::{ConfigError, RacerConfig};

/// Server-level configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// How long a single race may explore before giving up.
    pub time_limit: Duration,
    pub racer: RacerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            time_limit: Duration::from_secs(60),
            racer: RacerConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(value) = env::var("WIKIRACER_PORT") {
            config.port = value.parse().map_err(|_| ConfigError {
                name: "WIKIRACER_PORT",
                value,
            })?;
        }
        if let Ok(value) = env::var("WIKIRACER_TIME_LIMIT") {
            config.time_limit = parse_duration(&value).ok_or(ConfigError {
                name: "WIKIRACER_TIME_LIMIT",
                value,
            })?;
        }
        config.racer = RacerConfig::from_env()?;

        Ok(config)
    }
}

/// Parses Go-style duration strings: `300ms`, `45s`, `2m`, `1h`, and
/// compounds like `1m30s`. A bare number has no unit and is rejected.
pub fn parse_duration(value: &str) -> Option<Duration> {
    let mut rest = value.trim();
    if rest.is_empty() {
        return None;
    }

    let mut total = Duration::ZERO;
    while !rest.is_empty() {
        let digits_end = rest.find(|c: char| !c.is_ascii_digit() && c != '.')?;
        if digits_end == 0 {
            return None;
        }
        let (number, tail) = rest.split_at(digits_end);
        let amount: f64 = number.parse().ok()?;

        let unit_end = tail
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(tail.len());
        let (unit, remainder) = tail.split_at(unit_end);
        let unit_millis = match unit {
            "ms" => 1.0,
            "s" => 1_000.0,
            "m" => 60_000.0,
            "h" => 3_600_000.0,
            _ => return None,
        };

        total += Duration::from_millis((amount * unit_millis) as u64);
        rest = remainder;
    }
    Some(total)
}
