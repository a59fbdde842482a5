use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("Already visited: {0}")]
    AlreadyVisited(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// A failed page fetch. Callers treat it as "no content" for that address.
pub type FetchError = ScanError;

pub type Result<T> = std::result::Result<T, ScanError>;
