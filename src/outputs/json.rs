//! JSON snapshot of a batch.
//!
//! Each run writes one file under a directory named after the local date, so
//! several runs a day sit side by side:
//! `{json_output_dir}/{YYYY-MM-DD}/feeds_{HHMMSS}.json`.

use crate::models::{Article, FeedReport};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

#[derive(Debug, Serialize)]
struct Snapshot<'a> {
    fetched_at: String,
    total_articles: usize,
    feeds: &'a [FeedReport<Article>],
}

/// Path of the snapshot file for a run at `at`.
pub fn snapshot_path(json_output_dir: &Path, at: &DateTime<Local>) -> PathBuf {
    json_output_dir
        .join(at.format("%Y-%m-%d").to_string())
        .join(format!("feeds_{}.json", at.format("%H%M%S")))
}

/// Write `feeds` as a JSON snapshot taken at `at`.
///
/// # Returns
///
/// The path of the written file.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir.display()))]
pub async fn write_snapshot(
    feeds: &[FeedReport<Article>],
    json_output_dir: &Path,
    at: DateTime<Local>,
) -> Result<PathBuf, Box<dyn Error>> {
    let snapshot = Snapshot {
        fetched_at: at.to_rfc3339(),
        total_articles: feeds.iter().map(|feed| feed.articles.len()).sum(),
        feeds,
    };
    let json = serde_json::to_string_pretty(&snapshot)?;

    let path = snapshot_path(json_output_dir, &at);
    if let Some(dir) = path.parent() {
        info!(dir = %dir.display(), "Ensuring JSON directory exists");
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON snapshot");
    Ok(path)
}
