//! HTTP client for the headless content store's query, mutate, and asset
//! endpoints.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use eagsync_core::vehicle::StoredVehicle;

use crate::error::StoreError;

/// GROQ projection for the flat vehicle view the comparison consumes.
/// `galleryCount` sums the four category buckets; `signatureShot` resolves
/// to the asset URL so presence can be checked without a second query.
const ALL_VEHICLES_QUERY: &str = r#"*[_type == "vehicle"] {
    _id,
    listingTitle,
    "slug": slug.current,
    vin,
    stockNumber,
    chassis,
    mileage,
    listingPrice,
    showCallForPrice,
    transmission,
    exteriorColor,
    interiorColor,
    status,
    isLive,
    "signatureShot": signatureShot.asset->url,
    "galleryCount": count(galleryExterior) + count(galleryInterior) + count(galleryEngine) + count(galleryMisc)
}"#;

/// One document mutation, serialized in the store's externally-tagged form,
/// e.g. `{"create": {...}}`.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Mutation {
    Create(Value),
    CreateOrReplace(Value),
}

/// Connection settings for [`StoreClient`].
///
/// `url_override` replaces the project-derived API origin, which points the
/// client at a local server in tests.
#[derive(Clone)]
pub struct StoreConfig {
    pub project_id: String,
    pub dataset: String,
    pub token: String,
    pub api_version: String,
    pub url_override: Option<String>,
    pub request_timeout_secs: u64,
    pub upload_timeout_secs: u64,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("token", &"[redacted]")
            .field("api_version", &self.api_version)
            .field("url_override", &self.url_override)
            .finish_non_exhaustive()
    }
}

/// Client for the content store API. All requests carry bearer auth; queries
/// use the standard 30s-class timeout while asset uploads get a longer one.
pub struct StoreClient {
    http: Client,
    token: String,
    query_url: String,
    mutate_url: String,
    assets_url: String,
    request_timeout: Duration,
    upload_timeout: Duration,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
}

#[derive(Deserialize)]
struct AssetResponse {
    document: AssetDocument,
}

#[derive(Deserialize)]
struct AssetDocument {
    #[serde(rename = "_id")]
    id: String,
}

impl StoreClient {
    /// Creates a client from connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let base = config.url_override.clone().unwrap_or_else(|| {
            format!("https://{}.api.sanity.io", config.project_id)
        });
        let base = base.trim_end_matches('/');
        let version = &config.api_version;
        let dataset = &config.dataset;

        let http = Client::builder().build()?;
        Ok(Self {
            http,
            token: config.token.clone(),
            query_url: format!("{base}/v{version}/data/query/{dataset}"),
            mutate_url: format!("{base}/v{version}/data/mutate/{dataset}"),
            assets_url: format!("{base}/v{version}/assets/images/{dataset}"),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            upload_timeout: Duration::from_secs(config.upload_timeout_secs),
        })
    }

    /// Runs a GROQ query and returns the raw `result` value.
    ///
    /// # Errors
    ///
    /// - [`StoreError::UnexpectedStatus`] — any non-2xx status.
    /// - [`StoreError::Http`] — network failure.
    pub async fn query(&self, groq: &str) -> Result<Value, StoreError> {
        let response = self
            .http
            .get(&self.query_url)
            .bearer_auth(&self.token)
            .query(&[("query", groq)])
            .timeout(self.request_timeout)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.query_url.clone(),
            });
        }
        let body: QueryResponse = response.json().await?;
        Ok(body.result)
    }

    /// Fetches one vehicle document by slug, `None` when no document exists.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::query`].
    pub async fn fetch_vehicle(&self, slug: &str) -> Result<Option<Value>, StoreError> {
        let groq = format!(r#"*[_type == "vehicle" && slug.current == "{slug}"][0]"#);
        let result = self.query(&groq).await?;
        Ok(match result {
            Value::Null => None,
            other => Some(other),
        })
    }

    /// Fetches the flat projection of every vehicle document.
    ///
    /// # Errors
    ///
    /// [`Self::query`]'s taxonomy, plus [`StoreError::Deserialize`] when the
    /// projection does not match the expected shape.
    pub async fn fetch_all_vehicles(&self) -> Result<Vec<StoredVehicle>, StoreError> {
        let result = self.query(ALL_VEHICLES_QUERY).await?;
        let vehicles: Vec<StoredVehicle> =
            serde_json::from_value(result).map_err(|source| StoreError::Deserialize {
                context: "vehicle projection",
                source,
            })?;
        debug!(count = vehicles.len(), "fetched stored vehicles");
        Ok(vehicles)
    }

    /// Submits a mutation batch.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::query`].
    pub async fn mutate(&self, mutations: Vec<Mutation>) -> Result<(), StoreError> {
        let response = self
            .http
            .post(&self.mutate_url)
            .bearer_auth(&self.token)
            .json(&json!({ "mutations": mutations }))
            .timeout(self.request_timeout)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.mutate_url.clone(),
            });
        }
        Ok(())
    }

    /// Uploads image bytes to the asset endpoint and returns the asset ID.
    ///
    /// # Errors
    ///
    /// [`Self::query`]'s taxonomy, plus [`StoreError::Deserialize`] when the
    /// upload response carries no document ID.
    pub async fn upload_image(&self, bytes: Vec<u8>) -> Result<String, StoreError> {
        let response = self
            .http
            .post(&self.assets_url)
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, "image/jpeg")
            .body(bytes)
            .timeout(self.upload_timeout)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.assets_url.clone(),
            });
        }
        let body: Value = response.json().await?;
        let asset: AssetResponse =
            serde_json::from_value(body).map_err(|source| StoreError::Deserialize {
                context: "asset upload response",
                source,
            })?;
        Ok(asset.document.id)
    }
}
