//! Inventory scrape command: discover vehicle pages, scrape each one, and
//! write the snapshot file.
//!
//! Per-vehicle failures are logged and skipped rather than propagated so a
//! single bad page does not abort the full run.

use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use eagsync_core::{AppConfig, InventorySnapshot, VehicleStatus};
use eagsync_scraper::{listing, scrape_vehicle, ScrapeOptions, SiteClient, StatusFilter};

use crate::StatusArg;

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Current => StatusFilter::Current,
            StatusArg::Sold => StatusFilter::Sold,
            StatusArg::All => StatusFilter::All,
        }
    }
}

/// Scrape the inventory into the snapshot file at `config.snapshot_path`.
///
/// # Errors
///
/// Returns an error if the inventory index cannot be fetched or the snapshot
/// file cannot be written. Per-vehicle failures are logged and skipped.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    limit: Option<usize>,
    status: StatusArg,
) -> anyhow::Result<()> {
    let client = SiteClient::new(config.request_timeout_secs, &config.user_agent)
        .context("failed to build site client")?;

    let index_url = listing::inventory_url(&config.base_url, status.into());
    info!(url = %index_url, "fetching inventory index");
    let html = client
        .fetch_html(&index_url)
        .await
        .context("failed to fetch inventory index")?;

    let mut links = listing::vehicle_links(&html, &config.base_url);
    if let Some(limit) = limit {
        links.truncate(limit);
    }
    info!(count = links.len(), "discovered vehicle pages");

    let opts = ScrapeOptions {
        base_url: config.base_url.clone(),
        image_dir: config.image_dir.clone(),
        blog_image_dir: config.blog_image_dir.clone(),
        image_delay_ms: config.image_delay_ms,
    };

    let total = links.len();
    let mut vehicles = Vec::with_capacity(total);
    for (idx, link) in links.iter().enumerate() {
        match scrape_vehicle(&client, &opts, link).await {
            Ok(record) => {
                info!(slug = %record.slug, n = idx + 1, total, "scraped vehicle");
                vehicles.push(record);
            }
            Err(error) => warn!(slug = %link.slug, %error, "failed to scrape vehicle"),
        }
        tokio::time::sleep(Duration::from_millis(config.page_delay_ms)).await;
    }

    let current = vehicles
        .iter()
        .filter(|v| v.status == VehicleStatus::Current)
        .count();
    let sold = vehicles
        .iter()
        .filter(|v| v.status == VehicleStatus::Sold)
        .count();

    let snapshot = InventorySnapshot::new(index_url, vehicles);
    let json = serde_json::to_string_pretty(&snapshot)?;
    tokio::fs::write(&config.snapshot_path, json)
        .await
        .with_context(|| format!("failed to write {}", config.snapshot_path.display()))?;

    info!(
        path = %config.snapshot_path.display(),
        total = snapshot.total_vehicles,
        current,
        sold,
        "inventory snapshot written"
    );
    println!(
        "Scraped {} vehicles ({current} current, {sold} sold) -> {}",
        snapshot.total_vehicles,
        config.snapshot_path.display()
    );
    Ok(())
}
