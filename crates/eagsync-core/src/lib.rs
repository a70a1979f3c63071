use thiserror::Error;

pub mod app_config;
pub mod compare;
pub mod config;
pub mod snapshot;
pub mod story;
pub mod vehicle;

pub use app_config::AppConfig;
pub use compare::{compare, ComparisonReport, FieldDiff, MismatchedVehicle, MissingVehicle};
pub use config::{load_app_config, load_app_config_from_env};
pub use snapshot::{InventorySnapshot, StorySnapshot};
pub use story::StoryRecord;
pub use vehicle::{
    GalleryImage, ImageCategory, SignatureImage, StoredVehicle, VehicleImages, VehicleRecord,
    VehicleStatus,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
