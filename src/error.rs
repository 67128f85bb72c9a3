use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("no book found for '{query}': {reason}")]
    NotFound { query: String, reason: String },

    #[error("could not parse {url}: {reason}")]
    Parse { url: String, reason: String },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ScrapeError {
    /// Transport-level failures: the page was never seen.
    pub fn is_network(&self) -> bool {
        matches!(self, ScrapeError::Network { .. } | ScrapeError::Status { .. })
    }
}
