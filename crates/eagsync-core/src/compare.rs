//! Reconciliation engine: diffs the live (scraped) vehicle set against the
//! set stored in the content store, keyed by slug.
//!
//! The report is derived and ephemeral — it is regenerated in full on every
//! run and never incrementally updated. For fixed inputs the output is fully
//! deterministic: `missing_*` lists and mismatched entries are ordered
//! lexicographically by slug, and per-slug diffs follow [`COMPARED_FIELDS`]
//! order with the two derived diffs (signature presence, gallery count)
//! appended last.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::vehicle::{StoredVehicle, VehicleRecord};

/// Scalar fields compared for every slug present on both sides, in the
/// order their diffs are reported.
pub const COMPARED_FIELDS: [&str; 11] = [
    "listingTitle",
    "vin",
    "stockNumber",
    "chassis",
    "mileage",
    "listingPrice",
    "showCallForPrice",
    "transmission",
    "exteriorColor",
    "interiorColor",
    "status",
];

/// Gallery counts within this distance of each other are treated as equal;
/// small variances come from re-ordered or re-cropped gallery uploads.
pub const GALLERY_COUNT_TOLERANCE: i64 = 2;

/// Numeric values closer than this are treated as equal.
const NUMERIC_TOLERANCE: f64 = 0.01;

/// A vehicle as one side of a comparison. Implemented by the live
/// [`VehicleRecord`] and the stored projection [`StoredVehicle`] so the
/// engine itself is agnostic of which side holds which shape.
pub trait ComparableVehicle {
    fn slug(&self) -> &str;
    fn listing_title(&self) -> Option<&str>;
    fn listing_price(&self) -> Option<i64>;
    fn status_text(&self) -> Option<String>;
    fn vin(&self) -> Option<&str>;
    /// Value of one of [`COMPARED_FIELDS`] as a JSON value; absent fields
    /// are `Value::Null`.
    fn field_value(&self, field: &str) -> Value;
    fn has_signature_shot(&self) -> bool;
    fn gallery_count(&self) -> i64;
}

impl ComparableVehicle for VehicleRecord {
    fn slug(&self) -> &str {
        &self.slug
    }

    fn listing_title(&self) -> Option<&str> {
        self.listing_title.as_deref()
    }

    fn listing_price(&self) -> Option<i64> {
        self.listing_price
    }

    fn status_text(&self) -> Option<String> {
        Some(self.status.as_str().to_string())
    }

    fn vin(&self) -> Option<&str> {
        self.vin.as_deref()
    }

    fn field_value(&self, field: &str) -> Value {
        match field {
            "listingTitle" => json!(self.listing_title),
            "vin" => json!(self.vin),
            "stockNumber" => json!(self.stock_number),
            "chassis" => json!(self.chassis),
            "mileage" => json!(self.mileage),
            "listingPrice" => json!(self.listing_price),
            "showCallForPrice" => json!(self.show_call_for_price),
            "transmission" => json!(self.transmission),
            "exteriorColor" => json!(self.exterior_color),
            "interiorColor" => json!(self.interior_color),
            "status" => json!(self.status.as_str()),
            _ => Value::Null,
        }
    }

    fn has_signature_shot(&self) -> bool {
        self.images.signature_shot.is_some()
    }

    fn gallery_count(&self) -> i64 {
        self.images.gallery.len() as i64
    }
}

impl ComparableVehicle for StoredVehicle {
    fn slug(&self) -> &str {
        &self.slug
    }

    fn listing_title(&self) -> Option<&str> {
        self.listing_title.as_deref()
    }

    fn listing_price(&self) -> Option<i64> {
        self.listing_price
    }

    fn status_text(&self) -> Option<String> {
        self.status.clone()
    }

    fn vin(&self) -> Option<&str> {
        self.vin.as_deref()
    }

    fn field_value(&self, field: &str) -> Value {
        match field {
            "listingTitle" => json!(self.listing_title),
            "vin" => json!(self.vin),
            "stockNumber" => json!(self.stock_number),
            "chassis" => json!(self.chassis),
            "mileage" => json!(self.mileage),
            "listingPrice" => json!(self.listing_price),
            "showCallForPrice" => json!(self.show_call_for_price),
            "transmission" => json!(self.transmission),
            "exteriorColor" => json!(self.exterior_color),
            "interiorColor" => json!(self.interior_color),
            "status" => json!(self.status),
            _ => Value::Null,
        }
    }

    fn has_signature_shot(&self) -> bool {
        self.signature_shot.is_some()
    }

    fn gallery_count(&self) -> i64 {
        self.gallery_count.unwrap_or(0)
    }
}

/// One field-level difference for a slug present on both sides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDiff {
    pub field: String,
    pub live: Value,
    pub stored: Value,
}

/// A slug present on only one side of the comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingVehicle {
    pub slug: String,
    pub title: Option<String>,
    pub price: Option<i64>,
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
}

/// A slug present on both sides with at least one field difference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MismatchedVehicle {
    pub slug: String,
    pub title: Option<String>,
    pub differences: Vec<FieldDiff>,
}

/// Headline counts for the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub live_total: usize,
    pub stored_total: usize,
    pub missing_in_store: usize,
    pub missing_on_live: usize,
    pub mismatched: usize,
}

/// Full three-partition comparison of the live set against the stored set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub generated_at: String,
    pub summary: ComparisonSummary,
    pub missing_in_store: Vec<MissingVehicle>,
    pub missing_on_live: Vec<MissingVehicle>,
    pub mismatched: Vec<MismatchedVehicle>,
}

/// Returns `true` when `v` counts as absent for comparison purposes:
/// JSON `null`, the empty string, or the empty array.
fn is_absent(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

/// Field comparison policy:
///
/// 1. Both absent (null / `""` / `[]`) → equal.
/// 2. Both numeric → equal iff within [`NUMERIC_TOLERANCE`].
/// 3. Both arrays → equal iff the same *set* of elements, ignoring order
///    and duplicate count.
/// 4. Otherwise strict value equality.
#[must_use]
pub fn values_equal(live: &Value, stored: &Value) -> bool {
    if is_absent(live) && is_absent(stored) {
        return true;
    }

    if let (Some(a), Some(b)) = (live.as_f64(), stored.as_f64()) {
        if (a - b).abs() < NUMERIC_TOLERANCE {
            return true;
        }
    }

    if let (Value::Array(a), Value::Array(b)) = (live, stored) {
        let set_a: BTreeSet<String> = a.iter().map(Value::to_string).collect();
        let set_b: BTreeSet<String> = b.iter().map(Value::to_string).collect();
        if set_a == set_b {
            return true;
        }
    }

    live == stored
}

/// Compares one slug's two sides field by field, then appends the two
/// derived diffs: signature-image presence (rendered `Present`/`Missing`)
/// and gallery count (only when the counts differ by more than
/// [`GALLERY_COUNT_TOLERANCE`], rendered as `"<n> images"`).
fn diff_vehicle<L, S>(live: &L, stored: &S) -> Vec<FieldDiff>
where
    L: ComparableVehicle,
    S: ComparableVehicle,
{
    let mut differences = Vec::new();

    for field in COMPARED_FIELDS {
        let live_value = live.field_value(field);
        let stored_value = stored.field_value(field);
        if !values_equal(&live_value, &stored_value) {
            differences.push(FieldDiff {
                field: field.to_string(),
                live: live_value,
                stored: stored_value,
            });
        }
    }

    let live_signature = live.has_signature_shot();
    let stored_signature = stored.has_signature_shot();
    if live_signature != stored_signature {
        let render = |present: bool| if present { "Present" } else { "Missing" };
        differences.push(FieldDiff {
            field: "signatureShot".to_string(),
            live: json!(render(live_signature)),
            stored: json!(render(stored_signature)),
        });
    }

    let live_gallery = live.gallery_count();
    let stored_gallery = stored.gallery_count();
    if (live_gallery - stored_gallery).abs() > GALLERY_COUNT_TOLERANCE {
        differences.push(FieldDiff {
            field: "galleryImages".to_string(),
            live: json!(format!("{live_gallery} images")),
            stored: json!(format!("{stored_gallery} images")),
        });
    }

    differences
}

fn missing_entry<V: ComparableVehicle>(vehicle: &V, include_vin: bool) -> MissingVehicle {
    MissingVehicle {
        slug: vehicle.slug().to_string(),
        title: vehicle.listing_title().map(str::to_string),
        price: vehicle.listing_price(),
        status: vehicle.status_text(),
        vin: if include_vin {
            vehicle.vin().map(str::to_string)
        } else {
            None
        },
    }
}

/// Compares the live set against the stored set, keyed by slug.
///
/// Duplicate slugs within one side resolve last-seen-wins, matching how the
/// sets are built upstream; no duplication error is raised.
#[must_use]
pub fn compare<L, S>(live: &[L], stored: &[S]) -> ComparisonReport
where
    L: ComparableVehicle,
    S: ComparableVehicle,
{
    // BTreeMap keeps slug iteration lexicographic, which fixes the report
    // ordering for free.
    let live_by_slug: BTreeMap<&str, &L> = live.iter().map(|v| (v.slug(), v)).collect();
    let stored_by_slug: BTreeMap<&str, &S> = stored.iter().map(|v| (v.slug(), v)).collect();

    let mut missing_in_store = Vec::new();
    let mut mismatched = Vec::new();

    for (slug, live_vehicle) in &live_by_slug {
        match stored_by_slug.get(slug) {
            None => missing_in_store.push(missing_entry(*live_vehicle, true)),
            Some(stored_vehicle) => {
                let differences = diff_vehicle(*live_vehicle, *stored_vehicle);
                if !differences.is_empty() {
                    mismatched.push(MismatchedVehicle {
                        slug: (*slug).to_string(),
                        title: live_vehicle.listing_title().map(str::to_string),
                        differences,
                    });
                }
            }
        }
    }

    let missing_on_live: Vec<MissingVehicle> = stored_by_slug
        .iter()
        .filter(|(slug, _)| !live_by_slug.contains_key(*slug))
        .map(|(_, v)| missing_entry(*v, false))
        .collect();

    ComparisonReport {
        generated_at: Utc::now().to_rfc3339(),
        summary: ComparisonSummary {
            live_total: live.len(),
            stored_total: stored.len(),
            missing_in_store: missing_in_store.len(),
            missing_on_live: missing_on_live.len(),
            mismatched: mismatched.len(),
        },
        missing_in_store,
        missing_on_live,
        mismatched,
    }
}
