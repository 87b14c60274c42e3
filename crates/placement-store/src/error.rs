use placement_types::Collection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to {collection} failed: {source}")]
    Transport {
        collection: Collection,
        #[source]
        source: reqwest::Error,
    },

    #[error("{collection} answered HTTP {status}: {body}")]
    Status {
        collection: Collection,
        status: u16,
        body: String,
    },

    #[error("malformed {collection} row: {source}")]
    Decode {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },

    #[error("insert into {collection} returned {count} rows, expected exactly one")]
    UnexpectedRowCount { collection: Collection, count: usize },

    /// Raised by the in-memory store when a failure has been injected.
    #[error("{collection} unavailable: {reason}")]
    Unavailable {
        collection: Collection,
        reason: String,
    },
}

impl StoreError {
    pub fn collection(&self) -> Collection {
        match self {
            Self::Transport { collection, .. }
            | Self::Status { collection, .. }
            | Self::Decode { collection, .. }
            | Self::UnexpectedRowCount { collection, .. }
            | Self::Unavailable { collection, .. } => *collection,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is unset or blank")]
    Missing(&'static str),

    #[error("{name} is not a valid http(s) URL: {value}")]
    InvalidUrl { name: &'static str, value: String },
}
