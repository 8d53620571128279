use thiserror::Error;

pub type Result<T> = std::result::Result<T, RaceError>;

/// A fatal error raised inside a race. The first worker to hit one closes
/// the done latch and the whole race is abandoned.
#[derive(Error, Debug)]
pub enum RaceError {
    #[error("the page {0} does not exist")]
    MissingPage(String),

    #[error("request to the MediaWiki API failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed MediaWiki response: {source}\nbody: {body}")]
    MalformedResponse {
        source: serde_json::Error,
        body: String,
    },

    #[error("page entry has no title")]
    MissingTitle,

    #[error("continue block is missing the {0} cursor")]
    MissingCursor(&'static str),
}

/// An invalid environment value, surfaced at startup.
#[derive(Error, Debug)]
#[error("invalid value {value:?} for {name}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
}
