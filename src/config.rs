//! HTTP client settings for a batch.

use reqwest::Client;
use std::time::Duration;

/// Default `User-Agent` sent with every feed request.
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Settings for the shared HTTP client used by a batch.
///
/// The defaults leave timeouts to reqwest (no overall request timeout), so a
/// feed pipeline only ends early when the transport itself gives up.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Overall per-request timeout. `None` keeps the client default.
    pub timeout: Option<Duration>,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the reqwest client these settings describe.
    pub fn build_client(&self) -> Result<Client, reqwest::Error> {
        let mut builder = Client::builder().user_agent(self.user_agent.clone());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}
