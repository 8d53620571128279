use std::env;

use crate::error::ConfigError;
use crate::wiki::WIKIPEDIA_API_URL;

/// Tuning knobs for a race, fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct RacerConfig {
    /// Workers expanding outbound links from the start title.
    pub num_forward_workers: usize,
    /// Workers expanding inbound links from the end title.
    pub num_backward_workers: usize,
    /// Follow MediaWiki `continue` pagination instead of settling for the
    /// first 500 links of a page.
    pub explore_all_links: bool,
    /// Restrict exploration to mainspace articles (namespace 0).
    pub explore_only_articles: bool,
    /// Base URL of the MediaWiki API endpoint.
    pub api_url: String,
    /// Seed for the `pldir` coin flip. `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for RacerConfig {
    fn default() -> Self {
        Self {
            num_forward_workers: 15,
            num_backward_workers: 15,
            explore_all_links: false,
            explore_only_articles: true,
            api_url: WIKIPEDIA_API_URL.to_string(),
            rng_seed: None,
        }
    }
}

impl RacerConfig {
    /// Builds a config from the environment, falling back to defaults for
    /// unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(value) = env::var("NUM_FORWARD_LINKS_ROUTINES") {
            config.num_forward_workers = parse_worker_count("NUM_FORWARD_LINKS_ROUTINES", &value)?;
        }
        if let Ok(value) = env::var("NUM_BACKWARD_LINKS_ROUTINES") {
            config.num_backward_workers =
                parse_worker_count("NUM_BACKWARD_LINKS_ROUTINES", &value)?;
        }
        if let Ok(value) = env::var("EXPLORE_ALL_LINKS") {
            config.explore_all_links = parse_bool("EXPLORE_ALL_LINKS", &value)?;
        }
        if let Ok(value) = env::var("EXPLORE_ONLY_ARTICLES") {
            config.explore_only_articles = parse_bool("EXPLORE_ONLY_ARTICLES", &value)?;
        }

        Ok(config)
    }
}

fn parse_worker_count(name: &'static str, value: &str) -> Result<usize, ConfigError> {
    match value.parse::<usize>() {
        Ok(count) if count >= 1 => Ok(count),
        _ => Err(ConfigError {
            name,
            value: value.to_string(),
        }),
    }
}

pub(crate) fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Ok(true),
        "0" | "f" | "false" => Ok(false),
        _ => Err(ConfigError {
            name,
            value: value.to_string(),
        }),
    }
}
