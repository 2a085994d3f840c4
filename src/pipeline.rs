//! Batch orchestration: fetch, parse and map every feed of a batch concurrently.
//!
//! All per-URL pipelines are started together and joined with
//! [`futures::future::join_all`], which polls them inside the calling task and
//! returns only once every one of them has finished. A pipeline never fails:
//! a [`FetchError`](crate::error::FetchError) is logged and turned into a
//! [`FeedStatus::Failed`](crate::models::FeedStatus::Failed) report, so one bad
//! feed cannot cancel or affect its siblings.

use crate::config::FetchConfig;
use crate::error::FeedResult;
use crate::fetcher::{FeedFetcher, HttpFetcher};
use crate::mapper::map_items;
use crate::models::{Article, FeedBatch, FeedReport, ItemFields};
use crate::parser::parse_document;
use futures::future::join_all;
use std::time::Instant;
use tracing::{debug, error, info, instrument};

/// Run fetch, parse and map for one URL.
#[instrument(level = "info", skip_all, fields(%url))]
async fn process_feed<Fe, T, B>(fetcher: &Fe, url: &str, build: &B) -> FeedReport<T>
where
    Fe: FeedFetcher,
    B: Fn(ItemFields) -> T,
{
    let body = match fetcher.fetch(url).await {
        Ok(body) => body,
        Err(e) => {
            error!(%url, error = %e, "Feed fetch failed");
            return FeedReport::failed(url, e.to_string());
        }
    };

    let doc = parse_document(&body);
    let articles = map_items(&doc, build);
    debug!(%url, count = articles.len(), "Mapped feed items");
    FeedReport::fetched(url, articles)
}

/// Run every URL's pipeline with `fetcher`, building records with `build`.
///
/// Reports come back in the order of `urls`, whatever order the fetches
/// complete in.
#[instrument(level = "info", skip_all, fields(feeds = urls.len()))]
pub async fn collect_feeds_with<Fe, T, B, S>(fetcher: &Fe, urls: &[S], build: B) -> FeedBatch<T>
where
    Fe: FeedFetcher,
    B: Fn(ItemFields) -> T,
    S: AsRef<str>,
{
    let t0 = Instant::now();
    let build = &build;
    let feeds = join_all(
        urls.iter()
            .map(|url| process_feed(fetcher, url.as_ref(), build)),
    )
    .await;

    let batch = FeedBatch::new(feeds);
    info!(
        feeds = batch.len(),
        failed = batch.failed_count(),
        articles = batch.total_articles(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Batch complete"
    );
    batch
}

/// [`collect_feeds_with`] producing [`Article`]s.
pub async fn collect_feeds<Fe, S>(fetcher: &Fe, urls: &[S]) -> FeedBatch<Article>
where
    Fe: FeedFetcher,
    S: AsRef<str>,
{
    collect_feeds_with(fetcher, urls, Article::from).await
}

/// Fetch every URL over HTTP and map their items to [`Article`]s.
///
/// One client is built for the batch and shared by all fetches; it is dropped
/// when the batch returns.
///
/// # Errors
///
/// Only when the HTTP client cannot be built. Individual feed failures are
/// reported inside the returned batch.
pub async fn fetch_feeds<S>(urls: &[S], config: &FetchConfig) -> FeedResult<FeedBatch<Article>>
where
    S: AsRef<str>,
{
    let fetcher = HttpFetcher::new(config)?;
    Ok(collect_feeds(&fetcher, urls).await)
}
