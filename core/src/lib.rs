pub mod config;
pub mod error;
pub mod race;
pub mod wiki;

pub use config::RacerConfig;
pub use error::{ConfigError, RaceError, Result};
pub use race::Racer;
pub use wiki::{Direction, WikiClient, WIKIPEDIA_API_URL};
