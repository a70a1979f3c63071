use serde::{Deserialize, Serialize};

/// Sale state of a listing, derived from badge text on the live page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VehicleStatus {
    Current,
    Sold,
    SalePending,
}

impl VehicleStatus {
    /// Wire/display form, e.g. `"sale-pending"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleStatus::Current => "current",
            VehicleStatus::Sold => "sold",
            VehicleStatus::SalePending => "sale-pending",
        }
    }
}

/// Bucket a gallery image is filed under in the content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageCategory {
    Exterior,
    Interior,
    Engine,
    Misc,
}

/// The page's primary listing image, resolved from the `og:image` meta tag.
///
/// `local_path` is `None` when the download failed; the record is still
/// complete and sync simply omits the image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureImage {
    pub url: String,
    pub local_path: Option<String>,
}

/// One image harvested from a gallery section on the listing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryImage {
    pub url: String,
    pub local_path: Option<String>,
    pub category: ImageCategory,
}

/// Image set for one vehicle: an optional signature shot plus an ordered
/// gallery capped at [`MAX_GALLERY_IMAGES`] entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleImages {
    pub signature_shot: Option<SignatureImage>,
    #[serde(default)]
    pub gallery: Vec<GalleryImage>,
}

/// Global cap on gallery images per vehicle, enforced across all gallery
/// sections on a page (not per-section).
pub const MAX_GALLERY_IMAGES: usize = 20;

/// A vehicle listing scraped from the live site, normalized for the snapshot
/// file, the sync step, and comparison against the content store.
///
/// `slug` is the sole join key between the live and stored data sets and is
/// never regenerated once assigned. Every other field tolerates absence: a
/// structural miss during extraction leaves the field unset rather than
/// failing record construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    pub slug: String,
    pub listing_title: Option<String>,
    pub year: Option<i32>,
    /// Platform code from the title, uppercased (e.g. `"E92"`).
    pub chassis: Option<String>,
    /// Performance model from the title (e.g. `"M3"`).
    pub model: Option<String>,
    pub vin: Option<String>,
    pub stock_number: Option<String>,
    /// Currency-less integer price. May coexist with `show_call_for_price`:
    /// a record can hold a stale price while the flag hides it.
    pub listing_price: Option<i64>,
    /// `true` iff the price is unknown or hidden behind "call for price".
    pub show_call_for_price: bool,
    pub mileage: Option<i64>,
    pub transmission: Option<String>,
    pub engine_code: Option<String>,
    pub engine_size: Option<String>,
    pub exterior_color: Option<String>,
    pub interior_color: Option<String>,
    pub status: VehicleStatus,
    /// De-duplicated badge texts in document order.
    #[serde(default)]
    pub badges: Vec<String>,
    /// Ordered short strings from the highlights section, kept verbatim.
    #[serde(default)]
    pub highlights: Vec<String>,
    /// Blank-line-joined paragraphs; empty string when the section is absent.
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub history: String,
    #[serde(default)]
    pub eag_impressions: String,
    pub url: String,
    #[serde(default)]
    pub images: VehicleImages,
}

impl VehicleRecord {
    /// A record with only identity fields set; extraction fills in the rest.
    #[must_use]
    pub fn new(slug: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            listing_title: None,
            year: None,
            chassis: None,
            model: None,
            vin: None,
            stock_number: None,
            listing_price: None,
            show_call_for_price: true,
            mileage: None,
            transmission: None,
            engine_code: None,
            engine_size: None,
            exterior_color: None,
            interior_color: None,
            status: VehicleStatus::Current,
            badges: Vec::new(),
            highlights: Vec::new(),
            overview: String::new(),
            history: String::new(),
            eag_impressions: String::new(),
            url: url.into(),
            images: VehicleImages::default(),
        }
    }

    /// Returns `true` if a signature shot was resolved for this record.
    #[must_use]
    pub fn has_signature_shot(&self) -> bool {
        self.images.signature_shot.is_some()
    }

    /// Number of gallery images harvested for this record.
    #[must_use]
    pub fn gallery_count(&self) -> usize {
        self.images.gallery.len()
    }
}

/// Flat projection of a vehicle document as the comparison step queries it
/// from the content store.
///
/// `signature_shot` carries the resolved asset URL (presence is what the
/// comparison cares about); `gallery_count` is the summed size of the four
/// gallery buckets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredVehicle {
    pub slug: String,
    #[serde(default)]
    pub listing_title: Option<String>,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub stock_number: Option<String>,
    #[serde(default)]
    pub chassis: Option<String>,
    #[serde(default)]
    pub mileage: Option<i64>,
    #[serde(default)]
    pub listing_price: Option<i64>,
    #[serde(default)]
    pub show_call_for_price: Option<bool>,
    #[serde(default)]
    pub transmission: Option<String>,
    #[serde(default)]
    pub exterior_color: Option<String>,
    #[serde(default)]
    pub interior_color: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_live: Option<bool>,
    #[serde(default)]
    pub signature_shot: Option<String>,
    #[serde(default)]
    pub gallery_count: Option<i64>,
}
