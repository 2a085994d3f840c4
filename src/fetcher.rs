//! Feed retrieval over HTTP.
//!
//! The orchestrator is generic over [`FeedFetcher`], so anything that can turn
//! a URL into response text can drive a batch. [`HttpFetcher`] is the
//! production implementation: one shared reqwest [`Client`] (and with it one
//! connection pool) reused by every concurrent fetch in a batch.

use crate::config::FetchConfig;
use crate::error::FetchError;
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Trait for async feed retrieval.
// Fetch futures are joined inside one task, so no `Send` bound is promised.
#[allow(async_fn_in_trait)]
pub trait FeedFetcher {
    /// Fetch the body of `url` as text.
    ///
    /// # Errors
    ///
    /// [`FetchError::Status`] for any non-2xx answer and
    /// [`FetchError::Transport`] when no usable answer arrived.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// [`FeedFetcher`] backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher with its own client configured from `config`.
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: config.build_client()?,
        })
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl FeedFetcher for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let resp = self.client.get(url).send().await.map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        info!(status = status.as_u16(), %url, "Got response");

        let body = resp.text().await.map_err(transport)?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Read feed body"
        );
        Ok(body)
    }
}
