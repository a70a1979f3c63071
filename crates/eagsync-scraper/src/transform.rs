//! Assembly of full records from a detail page: fetch, extract, download
//! images, fill in local paths.
//!
//! Parsing happens in synchronous helpers that consume the page text and
//! return plain data before any download starts, so no parsed document is
//! held across an await point.

use std::path::{Path, PathBuf};
use std::time::Duration;

use scraper::Html;
use tracing::{debug, warn};

use eagsync_core::story::StoryRecord;
use eagsync_core::vehicle::{SignatureImage, VehicleRecord};

use crate::client::SiteClient;
use crate::error::ScraperError;
use crate::extract;
use crate::listing::DiscoveredLink;
use crate::story;

/// Knobs for the per-page scrape, sourced from `AppConfig`.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub base_url: String,
    /// Directory vehicle images are downloaded into.
    pub image_dir: PathBuf,
    /// Directory story images are downloaded into.
    pub blog_image_dir: PathBuf,
    /// Pause after each image download.
    pub image_delay_ms: u64,
}

/// Scrapes one vehicle detail page into a [`VehicleRecord`], downloading the
/// signature shot and gallery images along the way.
///
/// Image download failures are logged and leave `local_path` unset; they
/// never fail the record. Only the page fetch itself is fatal.
///
/// # Errors
///
/// Returns [`ScraperError`] when the detail page cannot be fetched.
pub async fn scrape_vehicle(
    client: &SiteClient,
    opts: &ScrapeOptions,
    link: &DiscoveredLink,
) -> Result<VehicleRecord, ScraperError> {
    let html = client.fetch_html(&link.url).await?;
    let mut record = extract_vehicle_record(&html, link, &opts.base_url);
    debug!(
        slug = %record.slug,
        title = record.listing_title.as_deref().unwrap_or("<none>"),
        gallery = record.gallery_count(),
        "extracted vehicle page"
    );

    if let Some(signature) = record.images.signature_shot.as_mut() {
        let ext = url_extension(&signature.url);
        let dest = opts.image_dir.join(format!("{}-signature{ext}", link.slug));
        signature.local_path = download_to(client, &signature.url, &dest, opts.image_delay_ms).await;
    }

    for (idx, image) in record.images.gallery.iter_mut().enumerate() {
        let ext = url_extension(&image.url);
        let dest = opts.image_dir.join(format!("{}-gallery-{idx}{ext}", link.slug));
        image.local_path = download_to(client, &image.url, &dest, opts.image_delay_ms).await;
    }

    Ok(record)
}

/// Scrapes one blog story page into a [`StoryRecord`], downloading its
/// featured image. Same failure policy as [`scrape_vehicle`].
///
/// # Errors
///
/// Returns [`ScraperError`] when the story page cannot be fetched.
pub async fn scrape_story(
    client: &SiteClient,
    opts: &ScrapeOptions,
    link: &DiscoveredLink,
) -> Result<StoryRecord, ScraperError> {
    let html = client.fetch_html(&link.url).await?;
    let mut record = extract_story_record(&html, link, &opts.base_url);
    debug!(slug = %record.slug, title = %record.title, "extracted story page");

    if let Some(image_url) = record.image_url.clone() {
        let ext = url_extension(&image_url);
        let dest = opts.blog_image_dir.join(format!("{}{ext}", link.slug));
        record.local_image = download_to(client, &image_url, &dest, opts.image_delay_ms).await;
    }

    Ok(record)
}

/// Pure extraction of a vehicle record from page text. Image `local_path`s
/// are left unset for the download pass.
#[must_use]
pub fn extract_vehicle_record(html: &str, link: &DiscoveredLink, base_url: &str) -> VehicleRecord {
    let doc = Html::parse_document(html);
    let mut record = VehicleRecord::new(&link.slug, &link.url);

    record.listing_title = extract::extract_title(&doc);
    if let Some(title) = record.listing_title.as_deref() {
        record.year = extract::extract_year(title);
        record.chassis = extract::extract_chassis(title);
        record.model = extract::extract_model(title);
    }

    let price_text = extract::extract_price_text(&doc);
    let (price, show_call) = extract::parse_price(price_text.as_deref().unwrap_or_default());
    record.listing_price = price;
    record.show_call_for_price = show_call;

    let specs = extract::extract_specifications(&doc);
    record.vin = specs.vin;
    record.stock_number = specs.stock_number;
    record.mileage = specs.mileage;
    record.transmission = specs.transmission;
    record.engine_code = specs.engine_code;
    record.engine_size = specs.engine_size;
    record.exterior_color = specs.exterior_color;
    record.interior_color = specs.interior_color;

    record.badges = extract::extract_badges(&doc);
    record.status = extract::derive_status(&record.badges);

    let content = extract::extract_content_sections(&doc);
    record.highlights = content.highlights;
    record.overview = content.overview;
    record.history = content.history;
    record.eag_impressions = content.eag_impressions;

    record.images.signature_shot = extract::meta_content(&doc, "og:image")
        .and_then(|raw| extract::absolutize(base_url, &raw))
        .map(|url| SignatureImage {
            url,
            local_path: None,
        });
    record.images.gallery = extract::extract_gallery(&doc, base_url);

    record
}

/// Pure extraction of a story record from page text. `local_image` is left
/// unset for the download pass.
#[must_use]
pub fn extract_story_record(html: &str, link: &DiscoveredLink, base_url: &str) -> StoryRecord {
    let doc = Html::parse_document(html);
    StoryRecord {
        title: story::extract_story_title(&doc)
            .unwrap_or_else(|| StoryRecord::title_from_slug(&link.slug)),
        slug: link.slug.clone(),
        excerpt: story::extract_story_excerpt(&doc).unwrap_or_default(),
        content: story::extract_story_content(&doc),
        date: story::extract_story_date(&doc).unwrap_or_default(),
        category: story::extract_story_category(&doc).unwrap_or_default(),
        url: link.url.clone(),
        image_url: story::extract_story_image(&doc, base_url),
        local_image: None,
    }
}

/// Downloads one image, pauses, and returns the destination path on success
/// or `None` on failure (logged, never fatal).
async fn download_to(
    client: &SiteClient,
    url: &str,
    dest: &Path,
    delay_ms: u64,
) -> Option<String> {
    let result = client.download_image(url, dest).await;
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    match result {
        Ok(()) => Some(dest.display().to_string()),
        Err(error) => {
            warn!(url, %error, "image download failed");
            None
        }
    }
}

/// File extension (with dot) taken from the URL path, defaulting to `.jpg`.
fn url_extension(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| {
            Path::new(u.path())
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
        })
        .unwrap_or_else(|| ".jpg".to_string())
}
