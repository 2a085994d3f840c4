//! Data models for feed items and batch results.
//!
//! This module defines the records that flow out of the pipeline:
//! - [`ItemFields`]: raw text pulled out of one `<item>` element
//! - [`Article`]: the default record built from those fields
//! - [`FeedReport`]: one URL's outcome within a batch
//! - [`FeedBatch`]: every report of a batch, in the order the URLs were given

use serde::{Deserialize, Serialize};

/// Raw text of the interesting sub-elements of one `<item>`.
///
/// Every field is the text of the first descendant element with that name,
/// or an empty string when the item has no such element. This is the input
/// of the construction function passed to [`crate::mapper::map_items`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFields {
    /// Text of `<title>`.
    pub title: String,
    /// Text of `<description>`, markup inside CDATA left as is.
    pub description: String,
    /// Text of `<pubDate>`, unparsed.
    pub pub_date: String,
    /// Text of `<link>`.
    pub link: String,
}

/// One feed entry.
///
/// Fields are never validated: an item without a description yields an
/// article with an empty `description`, and `date` is kept exactly as the
/// feed wrote it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// The item's headline.
    pub title: String,
    /// The item's summary body.
    pub description: String,
    /// The item's publication timestamp as raw text.
    pub date: String,
}

impl From<ItemFields> for Article {
    fn from(fields: ItemFields) -> Self {
        Self {
            title: fields.title,
            description: fields.description,
            date: fields.pub_date,
        }
    }
}

/// How fetching one URL went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FeedStatus {
    /// The feed was fetched and parsed; it may still have zero items.
    Fetched,
    /// The fetch failed and the feed contributed nothing.
    Failed { reason: String },
}

/// One URL's outcome within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedReport<T> {
    /// The feed URL as it was requested.
    pub url: String,
    /// Whether the fetch succeeded.
    pub status: FeedStatus,
    /// Records mapped from the feed's items, in document order. Always empty
    /// when `status` is [`FeedStatus::Failed`].
    pub articles: Vec<T>,
}

impl<T> FeedReport<T> {
    pub fn fetched(url: impl Into<String>, articles: Vec<T>) -> Self {
        Self {
            url: url.into(),
            status: FeedStatus::Fetched,
            articles,
        }
    }

    pub fn failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: FeedStatus::Failed {
                reason: reason.into(),
            },
            articles: Vec::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, FeedStatus::Failed { .. })
    }
}

/// Result of one batch: one report per requested URL, in request order.
///
/// Duplicate URLs in the request produce one report each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedBatch<T> {
    pub feeds: Vec<FeedReport<T>>,
}

impl<T> FeedBatch<T> {
    pub fn new(feeds: Vec<FeedReport<T>>) -> Self {
        Self { feeds }
    }

    /// All records of all feeds, feed by feed.
    pub fn articles(&self) -> impl Iterator<Item = &T> {
        self.feeds.iter().flat_map(|feed| feed.articles.iter())
    }

    /// Consume the batch, keeping only the records.
    pub fn into_articles(self) -> Vec<T> {
        self.feeds
            .into_iter()
            .flat_map(|feed| feed.articles)
            .collect()
    }

    pub fn total_articles(&self) -> usize {
        self.feeds.iter().map(|feed| feed.articles.len()).sum()
    }

    pub fn failed_count(&self) -> usize {
        self.feeds.iter().filter(|feed| feed.is_failed()).count()
    }

    /// First report for `url`.
    pub fn get(&self, url: &str) -> Option<&FeedReport<T>> {
        self.feeds.iter().find(|feed| feed.url == url)
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            description: String::new(),
            date: String::new(),
        }
    }

    #[test]
    fn test_article_from_item_fields() {
        let fields = ItemFields {
            title: "Headline".to_string(),
            description: "Body".to_string(),
            pub_date: "Tue, 06 May 2025 10:00:00 GMT".to_string(),
            link: "https://example.com/a".to_string(),
        };

        let article = Article::from(fields);
        assert_eq!(article.title, "Headline");
        assert_eq!(article.description, "Body");
        assert_eq!(article.date, "Tue, 06 May 2025 10:00:00 GMT");
    }

    #[test]
    fn test_failed_report_has_no_articles() {
        let report: FeedReport<Article> = FeedReport::failed("https://a.example", "HTTP 500");
        assert!(report.is_failed());
        assert!(report.articles.is_empty());
    }

    #[test]
    fn test_batch_accessors() {
        let batch = FeedBatch::new(vec![
            FeedReport::fetched("https://a.example", vec![article("a1"), article("a2")]),
            FeedReport::failed("https://b.example", "connection refused"),
            FeedReport::fetched("https://c.example", vec![]),
        ]);

        assert_eq!(batch.len(), 3);
        assert_eq!(batch.total_articles(), 2);
        assert_eq!(batch.failed_count(), 1);
        assert!(batch.get("https://b.example").unwrap().is_failed());
        assert!(batch.get("https://missing.example").is_none());

        let titles: Vec<&str> = batch.articles().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["a1", "a2"]);
        assert_eq!(batch.into_articles().len(), 2);
    }

    #[test]
    fn test_batch_serialization() {
        let batch = FeedBatch::new(vec![
            FeedReport::fetched("https://a.example", vec![article("a1")]),
            FeedReport::failed("https://b.example", "HTTP 404"),
        ]);

        let json = serde_json::to_string(&batch).unwrap();
        assert!(json.contains(r#""state":"fetched""#));
        assert!(json.contains(r#""state":"failed","reason":"HTTP 404""#));

        let back: FeedBatch<Article> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, batch);
    }
}
