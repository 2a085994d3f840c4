//! # Awful Feed Reader
//!
//! Reads a handful of RSS feeds at once and prints their articles.
//!
//! ## Usage
//!
//! ```sh
//! awful_feed_reader https://hnrss.org/newest -j ./json
//! ```
//!
//! ## Flow
//!
//! 1. **Fetching**: every feed is requested concurrently over one shared client
//! 2. **Parsing**: each response is parsed leniently and its items mapped to articles
//! 3. **Output**: articles are printed and, optionally, written as a JSON snapshot

use awful_feed_reader::cli::Cli;
use awful_feed_reader::fetch_feeds;
use awful_feed_reader::outputs::{json, text};
use awful_feed_reader::utils::ensure_writable_dir;
use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main(flavor = "current_thread")]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let start_time = std::time::Instant::now();
    info!("feed reader starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Early check: a snapshot directory we cannot write to is a usage error
    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir.display(),
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let urls = args.feed_urls();
    info!(feeds = urls.len(), "Fetching feeds");
    let fetched_at = Local::now();
    let batch = fetch_feeds(&urls, &args.fetch_config()).await?;

    print!("{}", text::render_batch(&batch));

    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = json::write_snapshot(&batch.feeds, dir, fetched_at).await {
            error!(error = %e, "Failed to write JSON snapshot");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        articles = batch.total_articles(),
        failed = batch.failed_count(),
        "Execution complete"
    );

    Ok(())
}
