//! Blog story scrape command.

use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use eagsync_core::{AppConfig, StorySnapshot};
use eagsync_scraper::{listing, scrape_story, ScrapeOptions, SiteClient};

/// Scrape blog stories into the snapshot file at `config.story_snapshot_path`.
///
/// # Errors
///
/// Returns an error if the blog index cannot be fetched or the snapshot file
/// cannot be written. Per-story failures are logged and skipped.
pub(crate) async fn run_stories(config: &AppConfig, limit: usize) -> anyhow::Result<()> {
    let client = SiteClient::new(config.request_timeout_secs, &config.user_agent)
        .context("failed to build site client")?;

    let index_url = listing::blog_url(&config.base_url);
    info!(url = %index_url, "fetching blog index");
    let html = client
        .fetch_html(&index_url)
        .await
        .context("failed to fetch blog index")?;

    let mut links = listing::story_links(&html, &config.base_url);
    links.truncate(limit);
    info!(count = links.len(), "discovered story pages");

    let opts = ScrapeOptions {
        base_url: config.base_url.clone(),
        image_dir: config.image_dir.clone(),
        blog_image_dir: config.blog_image_dir.clone(),
        image_delay_ms: config.image_delay_ms,
    };

    let total = links.len();
    let mut stories = Vec::with_capacity(total);
    for (idx, link) in links.iter().enumerate() {
        match scrape_story(&client, &opts, link).await {
            Ok(record) => {
                info!(slug = %record.slug, n = idx + 1, total, "scraped story");
                stories.push(record);
            }
            Err(error) => warn!(slug = %link.slug, %error, "failed to scrape story"),
        }
        tokio::time::sleep(Duration::from_millis(config.page_delay_ms)).await;
    }

    let snapshot = StorySnapshot::new(index_url, stories);
    let json = serde_json::to_string_pretty(&snapshot)?;
    tokio::fs::write(&config.story_snapshot_path, json)
        .await
        .with_context(|| format!("failed to write {}", config.story_snapshot_path.display()))?;

    info!(
        path = %config.story_snapshot_path.display(),
        total = snapshot.total_stories,
        "story snapshot written"
    );
    println!(
        "Scraped {} stories -> {}",
        snapshot.total_stories,
        config.story_snapshot_path.display()
    );
    Ok(())
}
