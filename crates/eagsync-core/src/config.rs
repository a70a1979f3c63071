use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric env var cannot be parsed. Store
/// credentials are optional here; the commands that need them validate via
/// [`AppConfig::store_credentials`] before any side effect.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric env var cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup
/// function — the core parsing logic, decoupled from the real environment so
/// it can be tested against a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let base_url = or_default("EAGSYNC_BASE_URL", "https://www.enthusiastauto.com");
    let store_project_id = lookup("EAGSYNC_STORE_PROJECT_ID").ok();
    let store_dataset = or_default("EAGSYNC_STORE_DATASET", "production");
    let store_token = lookup("EAGSYNC_STORE_TOKEN").ok();
    let store_api_version = or_default("EAGSYNC_STORE_API_VERSION", "2021-06-07");
    let store_url_override = lookup("EAGSYNC_STORE_URL").ok();

    let log_level = or_default("EAGSYNC_LOG_LEVEL", "info");
    let image_dir = PathBuf::from(or_default("EAGSYNC_IMAGE_DIR", "./vehicle-images"));
    let blog_image_dir = PathBuf::from(or_default("EAGSYNC_BLOG_IMAGE_DIR", "./blog-images"));
    let snapshot_path = PathBuf::from(or_default("EAGSYNC_SNAPSHOT_PATH", "./inventory_data.json"));
    let story_snapshot_path = PathBuf::from(or_default(
        "EAGSYNC_STORY_SNAPSHOT_PATH",
        "./blog-stories.json",
    ));
    let comparison_json_path = PathBuf::from(or_default(
        "EAGSYNC_COMPARISON_JSON_PATH",
        "./inventory_comparison.json",
    ));
    let comparison_html_path = PathBuf::from(or_default(
        "EAGSYNC_COMPARISON_HTML_PATH",
        "./inventory_comparison.html",
    ));

    let request_timeout_secs = parse_u64("EAGSYNC_REQUEST_TIMEOUT_SECS", "30")?;
    let upload_timeout_secs = parse_u64("EAGSYNC_UPLOAD_TIMEOUT_SECS", "60")?;
    let user_agent = or_default(
        "EAGSYNC_USER_AGENT",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36",
    );
    let image_delay_ms = parse_u64("EAGSYNC_IMAGE_DELAY_MS", "300")?;
    let page_delay_ms = parse_u64("EAGSYNC_PAGE_DELAY_MS", "1500")?;
    let upload_delay_ms = parse_u64("EAGSYNC_UPLOAD_DELAY_MS", "200")?;
    let sync_delay_ms = parse_u64("EAGSYNC_SYNC_DELAY_MS", "1000")?;

    Ok(AppConfig {
        base_url,
        store_project_id,
        store_dataset,
        store_token,
        store_api_version,
        store_url_override,
        log_level,
        image_dir,
        blog_image_dir,
        snapshot_path,
        story_snapshot_path,
        comparison_json_path,
        comparison_html_path,
        request_timeout_secs,
        upload_timeout_secs,
        user_agent,
        image_delay_ms,
        page_delay_ms,
        upload_delay_ms,
        sync_delay_ms,
    })
}
