//! # Awful Feed Reader
//!
//! Fetches RSS feeds concurrently and turns their `<item>` elements into
//! lightweight article records.
//!
//! ## Pipeline
//!
//! Each URL of a batch goes through the same three stages:
//! 1. **Fetch**: one HTTP GET through a client shared by the whole batch ([`fetcher`])
//! 2. **Parse**: lenient XML parse that survives malformed markup ([`parser`])
//! 3. **Map**: one record per `item` element, in document order ([`mapper`])
//!
//! [`pipeline`] runs all URLs at once, waits for every one of them and returns
//! a [`FeedBatch`] with one report per URL. A feed that cannot be fetched is
//! logged and reported as failed with no articles; it never affects the others.
//!
//! ## Usage
//!
//! ```no_run
//! use awful_feed_reader::{FetchConfig, fetch_feeds};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let urls = ["https://hnrss.org/newest"];
//! let batch = fetch_feeds(&urls, &FetchConfig::default()).await?;
//! for article in batch.articles() {
//!     println!("{} ({})", article.title, article.date);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod mapper;
pub mod models;
pub mod outputs;
pub mod parser;
pub mod pipeline;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use config::FetchConfig;
pub use error::{FeedError, FetchError};
pub use fetcher::{FeedFetcher, HttpFetcher};
pub use models::{Article, FeedBatch, FeedReport, FeedStatus, ItemFields};
pub use pipeline::{collect_feeds, collect_feeds_with, fetch_feeds};
