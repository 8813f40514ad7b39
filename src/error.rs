// src/error.rs
use thiserror::Error;

/// The page could not be fetched; nothing downstream can run.
#[derive(Debug, Error)]
#[error("fetching {url} failed after {attempts} attempt(s)")]
pub struct FetchError {
    pub url: String,
    pub attempts: u32,
    #[source]
    pub source: FetchFailure,
}

#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// One table could not be turned into rows. The table is skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableParseError {
    #[error("table {index} contains a nested table")]
    NestedTable { index: usize },

    #[error("table {index} has no rows")]
    NoRows { index: usize },
}

/// Stops before anything is written.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("no tables found on the page")]
    EmptyInput,

    #[error("invalid table selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

/// One message could not be delivered. Sibling messages are unaffected.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("serializing message: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("delivery failed: {0}")]
    Delivery(#[from] rdkafka::error::KafkaError),
}
