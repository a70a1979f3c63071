//! Compare command: diff the local snapshot against the content store.

use anyhow::Context;
use tracing::info;

use eagsync_core::AppConfig;
use eagsync_store::{StoreClient, StoreConfig};

use crate::report;
use crate::sync::load_snapshot;
use crate::FormatArg;

pub(crate) async fn run_compare(config: &AppConfig, format: FormatArg) -> anyhow::Result<()> {
    let credentials = config
        .store_credentials()
        .context("store credentials are required for compare")?;
    let client = StoreClient::new(&StoreConfig {
        project_id: credentials.project_id,
        dataset: config.store_dataset.clone(),
        token: credentials.token,
        api_version: config.store_api_version.clone(),
        url_override: config.store_url_override.clone(),
        request_timeout_secs: config.request_timeout_secs,
        upload_timeout_secs: config.upload_timeout_secs,
    })
    .context("failed to build store client")?;

    let snapshot = load_snapshot(&config.snapshot_path).await?;
    let stored = client
        .fetch_all_vehicles()
        .await
        .context("failed to fetch stored vehicles")?;
    info!(
        live = snapshot.total_vehicles,
        stored = stored.len(),
        "comparing inventories"
    );

    let report = eagsync_core::compare(&snapshot.vehicles, &stored);

    if matches!(format, FormatArg::Console | FormatArg::All) {
        println!("{}", report::render_console(&report));
    }
    if matches!(format, FormatArg::Json | FormatArg::All) {
        let json = serde_json::to_string_pretty(&report)?;
        tokio::fs::write(&config.comparison_json_path, json)
            .await
            .with_context(|| format!("failed to write {}", config.comparison_json_path.display()))?;
        println!("JSON report saved to {}", config.comparison_json_path.display());
    }
    if matches!(format, FormatArg::Html | FormatArg::All) {
        let html = report::render_html(&report);
        tokio::fs::write(&config.comparison_html_path, html)
            .await
            .with_context(|| format!("failed to write {}", config.comparison_html_path.display()))?;
        println!("HTML report saved to {}", config.comparison_html_path.display());
    }
    Ok(())
}
