use std::path::PathBuf;

/// Credentials for the content store, validated by the commands that write
/// to or query it. Scraping never needs them.
#[derive(Clone)]
pub struct StoreCredentials {
    pub project_id: String,
    pub token: String,
}

#[derive(Clone)]
pub struct AppConfig {
    /// Origin of the dealership site, e.g. `https://www.enthusiastauto.com`.
    pub base_url: String,
    pub store_project_id: Option<String>,
    pub store_dataset: String,
    pub store_token: Option<String>,
    pub store_api_version: String,
    /// Full endpoint base overriding the project-id derived URL; used to
    /// point the client at a local mock.
    pub store_url_override: Option<String>,
    pub log_level: String,
    pub image_dir: PathBuf,
    pub blog_image_dir: PathBuf,
    pub snapshot_path: PathBuf,
    pub story_snapshot_path: PathBuf,
    pub comparison_json_path: PathBuf,
    pub comparison_html_path: PathBuf,
    pub request_timeout_secs: u64,
    pub upload_timeout_secs: u64,
    pub user_agent: String,
    /// Delay after each image download.
    pub image_delay_ms: u64,
    /// Delay between vehicle/story page fetches.
    pub page_delay_ms: u64,
    /// Delay after each asset upload to the store.
    pub upload_delay_ms: u64,
    /// Delay between per-vehicle sync passes.
    pub sync_delay_ms: u64,
}

impl AppConfig {
    /// Returns the store credentials, or a descriptive configuration error
    /// naming the first missing variable.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::MissingEnvVar`] when the project id or
    /// API token is not configured.
    pub fn store_credentials(&self) -> Result<StoreCredentials, crate::ConfigError> {
        let project_id = self
            .store_project_id
            .clone()
            .ok_or_else(|| crate::ConfigError::MissingEnvVar("EAGSYNC_STORE_PROJECT_ID".into()))?;
        let token = self
            .store_token
            .clone()
            .ok_or_else(|| crate::ConfigError::MissingEnvVar("EAGSYNC_STORE_TOKEN".into()))?;
        Ok(StoreCredentials { project_id, token })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field("store_project_id", &self.store_project_id)
            .field("store_dataset", &self.store_dataset)
            .field(
                "store_token",
                &self.store_token.as_ref().map(|_| "[redacted]"),
            )
            .field("store_api_version", &self.store_api_version)
            .field("store_url_override", &self.store_url_override)
            .field("log_level", &self.log_level)
            .field("image_dir", &self.image_dir)
            .field("blog_image_dir", &self.blog_image_dir)
            .field("snapshot_path", &self.snapshot_path)
            .field("story_snapshot_path", &self.story_snapshot_path)
            .field("comparison_json_path", &self.comparison_json_path)
            .field("comparison_html_path", &self.comparison_html_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("upload_timeout_secs", &self.upload_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("image_delay_ms", &self.image_delay_ms)
            .field("page_delay_ms", &self.page_delay_ms)
            .field("upload_delay_ms", &self.upload_delay_ms)
            .field("sync_delay_ms", &self.sync_delay_ms)
            .finish()
    }
}
