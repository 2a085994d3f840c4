//! Error types for the feed pipeline.
//!
//! Only two things can go wrong in the library: a single feed cannot be
//! fetched ([`FetchError`], recovered per URL by the orchestrator) or the
//! shared HTTP client cannot be built ([`FeedError`], raised before any
//! fetch starts).

use reqwest::StatusCode;
use thiserror::Error;

/// A failed GET for one feed URL.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The server answered with a status outside `200..=299`.
    #[error("HTTP {status} for URL {url}")]
    Status { url: String, status: StatusCode },

    /// DNS, connect, TLS, timeout or body read failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// The URL whose fetch failed.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Status { url, .. } | FetchError::Transport { url, .. } => url,
        }
    }

    /// The HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport { source, .. } => source.status(),
        }
    }
}

/// Failure to set up a batch.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

pub type FeedResult<T> = Result<T, FeedError>;
