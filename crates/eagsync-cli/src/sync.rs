//! Sync command: push the vehicle snapshot to the content store.
//!
//! Credentials are validated before any side effect. Per-vehicle failures
//! are counted and logged, never propagated, so one bad document does not
//! abort the batch.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use eagsync_core::vehicle::MAX_GALLERY_IMAGES;
use eagsync_core::{AppConfig, InventorySnapshot, VehicleRecord};
use eagsync_store::{
    build_vehicle_document, GalleryRef, ImageRefs, Mutation, StoreClient, StoreConfig,
};

pub(crate) async fn run_sync(
    config: &AppConfig,
    dry_run: bool,
    chassis: Option<&str>,
    slugs: Option<&str>,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let credentials = config
        .store_credentials()
        .context("store credentials are required for sync")?;
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
    info!(
        total = snapshot.total_vehicles,
        path = %config.snapshot_path.display(),
        "loaded inventory snapshot"
    );

    let mut vehicles = snapshot.vehicles;
    if let Some(chassis) = chassis {
        vehicles.retain(|v| v.chassis.as_deref() == Some(chassis));
        info!(count = vehicles.len(), chassis, "filtered by chassis");
    }
    if let Some(slugs) = slugs {
        let wanted: Vec<&str> = slugs.split(',').map(str::trim).collect();
        vehicles.retain(|v| wanted.contains(&v.slug.as_str()));
        info!(count = vehicles.len(), "filtered by slug list");
    }
    if let Some(limit) = limit {
        vehicles.truncate(limit);
    }
    if vehicles.is_empty() {
        println!("No vehicles to sync after filtering");
        return Ok(());
    }

    if dry_run {
        println!("Dry run: no changes will be made\n");
    }

    let total = vehicles.len();
    let mut success = 0usize;
    let mut failed = 0usize;
    for (idx, vehicle) in vehicles.iter().enumerate() {
        if sync_vehicle(&client, config, vehicle, dry_run).await {
            success += 1;
        } else {
            failed += 1;
        }
        info!(n = idx + 1, total, "sync progress");
        if !dry_run {
            tokio::time::sleep(Duration::from_millis(config.sync_delay_ms)).await;
        }
    }

    println!("\nSync complete: {total} vehicles, {success} succeeded, {failed} failed");
    Ok(())
}

pub(crate) async fn load_snapshot(path: &Path) -> anyhow::Result<InventorySnapshot> {
    let raw = tokio::fs::read_to_string(path).await.with_context(|| {
        format!(
            "snapshot file {} not found; run the scrape command first",
            path.display()
        )
    })?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))
}

/// Sync one vehicle: decide create vs. update, upload its images, submit a
/// single-mutation batch. Returns `false` on failure.
async fn sync_vehicle(
    client: &StoreClient,
    config: &AppConfig,
    vehicle: &VehicleRecord,
    dry_run: bool,
) -> bool {
    let slug = &vehicle.slug;

    // A lookup failure is treated as "not found" so a transient query error
    // degrades to a create attempt instead of skipping the vehicle.
    let existing = match client.fetch_vehicle(slug).await {
        Ok(doc) => doc,
        Err(error) => {
            warn!(slug = %slug, %error, "existence check failed, assuming new");
            None
        }
    };
    let action = if existing.is_some() { "update" } else { "create" };

    if dry_run {
        println!("[dry-run] would {action} {slug}");
        return true;
    }

    let mut image_refs = ImageRefs::default();
    if let Some(signature) = &vehicle.images.signature_shot {
        if let Some(path) = signature.local_path.as_deref() {
            image_refs.signature_shot = upload_local_image(client, path).await;
            tokio::time::sleep(Duration::from_millis(config.upload_delay_ms)).await;
        }
    }
    for image in vehicle.images.gallery.iter().take(MAX_GALLERY_IMAGES) {
        let Some(path) = image.local_path.as_deref() else {
            continue;
        };
        if let Some(asset_id) = upload_local_image(client, path).await {
            image_refs.gallery.push(GalleryRef {
                asset_id,
                category: image.category,
            });
        }
        tokio::time::sleep(Duration::from_millis(config.upload_delay_ms)).await;
    }
    info!(
        slug = %slug,
        signature = image_refs.signature_shot.is_some(),
        gallery = image_refs.gallery.len(),
        "uploaded images"
    );

    let doc = build_vehicle_document(vehicle, &image_refs);
    let mutation = if existing.is_some() {
        Mutation::CreateOrReplace(doc)
    } else {
        Mutation::Create(doc)
    };

    match client.mutate(vec![mutation]).await {
        Ok(()) => {
            info!(slug = %slug, action, "synced vehicle");
            true
        }
        Err(error) => {
            warn!(slug = %slug, %error, "failed to sync vehicle");
            false
        }
    }
}

/// Upload one local image file, returning its asset ID. Missing files and
/// upload failures are logged and yield `None`.
async fn upload_local_image(client: &StoreClient, path: &str) -> Option<String> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(error) => {
            warn!(path, %error, "cannot read image file");
            return None;
        }
    };
    match client.upload_image(bytes).await {
        Ok(asset_id) => Some(asset_id),
        Err(error) => {
            warn!(path, %error, "image upload failed");
            None
        }
    }
}
