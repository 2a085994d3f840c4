//! Command-line interface definitions.
//!
//! Every option can also come from an environment variable.

use crate::config::{DEFAULT_USER_AGENT, FetchConfig};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Feeds read when no URL is given on the command line.
pub const DEFAULT_FEEDS: &[&str] = &[
    "https://www.yahoo.com/news/rss/world",
    "https://hnrss.org/newest",
    "https://www.yahoo.com/news/rss/sports",
];

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Read the default feeds
/// awful_feed_reader
///
/// # Read two feeds and keep a JSON snapshot
/// awful_feed_reader https://hnrss.org/newest https://lwn.net/headlines/rss -j ./json
///
/// # Give up on slow feeds after 15 seconds
/// awful_feed_reader --timeout-secs 15
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Feed URLs to read (defaults to a few news feeds)
    #[arg(value_parser = parse_feed_url)]
    pub urls: Vec<String>,

    /// Directory for the JSON snapshot of the batch
    #[arg(short, long, env = "FEED_JSON_OUTPUT_DIR")]
    pub json_output_dir: Option<PathBuf>,

    /// Per-request timeout in seconds (no timeout when omitted)
    #[arg(short, long, env = "FEED_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// User-Agent header sent with every request
    #[arg(long, env = "FEED_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

impl Cli {
    /// URLs to fetch: the ones given, or [`DEFAULT_FEEDS`].
    pub fn feed_urls(&self) -> Vec<String> {
        if self.urls.is_empty() {
            DEFAULT_FEEDS.iter().map(|url| url.to_string()).collect()
        } else {
            self.urls.clone()
        }
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig::default()
            .with_timeout(self.timeout_secs.map(Duration::from_secs))
            .with_user_agent(self.user_agent.clone())
    }
}

/// Accept absolute http(s) URLs only.
fn parse_feed_url(raw: &str) -> Result<String, String> {
    let url = Url::parse(raw).map_err(|e| format!("invalid URL `{raw}`: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(raw.to_string()),
        other => Err(format!("unsupported scheme `{other}` in `{raw}`")),
    }
}
