//! Terminal rendering of a batch.

use crate::models::{Article, FeedBatch, FeedStatus};
use crate::utils::truncate_for_log;
use itertools::Itertools;
use scraper::Html;
use std::fmt::Write;

const PREVIEW_CHARS: usize = 160;

/// Visible text of an HTML fragment with whitespace collapsed.
pub fn plain_text(html: &str) -> String {
    let text: String = Html::parse_fragment(html).root_element().text().collect();
    text.split_whitespace().join(" ")
}

/// Render every feed of the batch: a header per feed, then one entry per
/// article with its date, title and a short plain-text preview.
pub fn render_batch(batch: &FeedBatch<Article>) -> String {
    let mut out = String::new();

    for feed in &batch.feeds {
        match &feed.status {
            FeedStatus::Fetched => {
                let _ = writeln!(out, "== {} ({} articles)", feed.url, feed.articles.len());
            }
            FeedStatus::Failed { reason } => {
                let _ = writeln!(out, "== {} (failed: {})", feed.url, reason);
            }
        }

        for article in &feed.articles {
            let date: &str = if article.date.is_empty() { "-" } else { &article.date };
            let _ = writeln!(out, "  [{}] {}", date, article.title);
            let preview = plain_text(&article.description);
            if !preview.is_empty() {
                let _ = writeln!(out, "      {}", truncate_for_log(&preview, PREVIEW_CHARS));
            }
        }
    }

    let _ = writeln!(
        out,
        "{} articles from {} feeds ({} failed)",
        batch.total_articles(),
        batch.len(),
        batch.failed_count()
    );
    out
}
