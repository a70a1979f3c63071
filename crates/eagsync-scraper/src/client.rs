//! HTTP client for the dealership's public pages and image assets.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;

/// Thin wrapper over `reqwest::Client` with the scrape profile applied:
/// request timeout, browser-like `User-Agent`, typed status errors.
///
/// Every request is a single attempt — extraction degrades to absent fields
/// on failure instead of retrying, so there is no retry policy here.
pub struct SiteClient {
    client: Client,
}

impl SiteClient {
    /// Creates a `SiteClient` with the configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches a page and returns its body as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UnexpectedStatus`] — any non-2xx status.
    /// - [`ScraperError::Http`] — network or TLS failure.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        Ok(response.text().await?)
    }

    /// Fetches a binary asset (image) and returns its bytes.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::fetch_html`].
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ScraperError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Downloads an image to `dest`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] / [`ScraperError::UnexpectedStatus`] — fetch failure.
    /// - [`ScraperError::Io`] — the file or its directory cannot be written.
    pub async fn download_image(&self, url: &str, dest: &Path) -> Result<(), ScraperError> {
        let bytes = self.fetch_bytes(url).await?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ScraperError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(dest, bytes)
            .await
            .map_err(|source| ScraperError::Io {
                path: dest.to_path_buf(),
                source,
            })
    }
}
