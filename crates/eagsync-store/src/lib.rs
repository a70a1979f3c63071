pub mod client;
pub mod document;
pub mod error;
pub mod portable_text;

pub use client::{Mutation, StoreClient, StoreConfig};
pub use document::{build_vehicle_document, GalleryRef, ImageRefs};
pub use error::StoreError;
