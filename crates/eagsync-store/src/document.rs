//! Building the store's vehicle document from a scraped record plus the
//! asset IDs of the images already uploaded.

use serde_json::{json, Map, Value};

use eagsync_core::vehicle::{ImageCategory, VehicleRecord};

use crate::portable_text::{image_key, list_to_blocks, text_to_blocks};

/// An uploaded gallery image: the store asset ID plus the category bucket it
/// belongs in.
#[derive(Debug, Clone)]
pub struct GalleryRef {
    pub asset_id: String,
    pub category: ImageCategory,
}

/// Asset IDs produced by the upload pass, consumed by document building.
#[derive(Debug, Clone, Default)]
pub struct ImageRefs {
    pub signature_shot: Option<String>,
    pub gallery: Vec<GalleryRef>,
}

fn image_ref(asset_id: &str) -> Value {
    json!({
        "_type": "image",
        "asset": { "_type": "reference", "_ref": asset_id },
    })
}

fn keyed_image_ref(asset_id: &str) -> Value {
    json!({
        "_type": "image",
        "_key": image_key(asset_id),
        "asset": { "_type": "reference", "_ref": asset_id },
    })
}

/// Merchandising tag derived from badge text, priority order: new arrival,
/// then price reduction, then sold. `None` when no badge matches.
#[must_use]
pub fn status_tag(badges: &[String]) -> Option<&'static str> {
    let badge_text = badges.join(" ").to_lowercase();
    if badge_text.contains("new arrival") {
        Some("New Arrival")
    } else if badge_text.contains("reduced") {
        Some("Reduced Price")
    } else if badge_text.contains("sold") {
        Some("Sold")
    } else {
        None
    }
}

/// Builds the full vehicle document for a create-or-replace mutation.
///
/// The document ID is `vehicle-{slug}`, so re-syncing a slug always targets
/// the same document. Identity fields (`listingTitle`, `slug`, `status`,
/// `isLive`, `showCallForPrice`) are always present; every other field is
/// included only when the scrape produced a value, which means a replace
/// drops fields the latest scrape failed to extract.
#[must_use]
pub fn build_vehicle_document(vehicle: &VehicleRecord, image_refs: &ImageRefs) -> Value {
    let mut doc = Map::new();
    doc.insert("_type".into(), json!("vehicle"));
    doc.insert("_id".into(), json!(format!("vehicle-{}", vehicle.slug)));
    doc.insert("listingTitle".into(), json!(vehicle.listing_title));
    doc.insert(
        "slug".into(),
        json!({ "_type": "slug", "current": vehicle.slug }),
    );
    doc.insert("status".into(), json!(vehicle.status.as_str()));
    doc.insert("isLive".into(), json!(true));
    doc.insert("showCallForPrice".into(), json!(vehicle.show_call_for_price));

    let mut put_str = |key: &str, value: &Option<String>| {
        if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
            doc.insert(key.into(), json!(v));
        }
    };
    put_str("vin", &vehicle.vin);
    put_str("stockNumber", &vehicle.stock_number);
    put_str("chassis", &vehicle.chassis);
    put_str("transmission", &vehicle.transmission);
    put_str("engineSize", &vehicle.engine_size);
    put_str("exteriorColor", &vehicle.exterior_color);
    put_str("interiorColor", &vehicle.interior_color);

    if let Some(mileage) = vehicle.mileage {
        doc.insert("mileage".into(), json!(mileage));
    }
    if let Some(price) = vehicle.listing_price {
        doc.insert("listingPrice".into(), json!(price));
    }
    // The store models engine codes as a list even though the page shows one.
    if let Some(code) = vehicle.engine_code.as_deref().filter(|c| !c.is_empty()) {
        doc.insert("engineCodes".into(), json!([code]));
    }

    if let Some(asset_id) = image_refs.signature_shot.as_deref() {
        doc.insert("signatureShot".into(), image_ref(asset_id));
    }

    let mut exterior = Vec::new();
    let mut interior = Vec::new();
    let mut engine = Vec::new();
    let mut misc = Vec::new();
    for gallery_ref in &image_refs.gallery {
        let obj = keyed_image_ref(&gallery_ref.asset_id);
        match gallery_ref.category {
            ImageCategory::Exterior => exterior.push(obj),
            ImageCategory::Interior => interior.push(obj),
            ImageCategory::Engine => engine.push(obj),
            ImageCategory::Misc => misc.push(obj),
        }
    }
    for (key, bucket) in [
        ("galleryExterior", exterior),
        ("galleryInterior", interior),
        ("galleryEngine", engine),
        ("galleryMisc", misc),
    ] {
        if !bucket.is_empty() {
            doc.insert(key.into(), Value::Array(bucket));
        }
    }

    if !vehicle.highlights.is_empty() {
        doc.insert("highlights".into(), Value::Array(list_to_blocks(&vehicle.highlights)));
    }
    if !vehicle.overview.is_empty() {
        doc.insert("overview".into(), Value::Array(text_to_blocks(&vehicle.overview)));
    }
    if !vehicle.history.is_empty() {
        doc.insert("history".into(), Value::Array(text_to_blocks(&vehicle.history)));
    }

    if let Some(tag) = status_tag(&vehicle.badges) {
        doc.insert("statusTag".into(), json!(tag));
    }

    Value::Object(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eagsync_core::vehicle::VehicleStatus;

    fn record() -> VehicleRecord {
        let mut v = VehicleRecord::new("2011-bmw-e92-m3", "https://example.com/inventory/2011-bmw-e92-m3");
        v.listing_title = Some("2011 BMW E92 M3".to_string());
        v.vin = Some("WBSKG9C50BE123456".to_string());
        v.mileage = Some(45_231);
        v.listing_price = Some(45_000);
        v.show_call_for_price = false;
        v.engine_code = Some("S65".to_string());
        v.status = VehicleStatus::Current;
        v.badges = vec!["New Arrival".to_string()];
        v.highlights = vec!["Competition Package".to_string()];
        v.overview = "A well-kept example.".to_string();
        v
    }

    #[test]
    fn identity_fields_always_present() {
        let doc = build_vehicle_document(&record(), &ImageRefs::default());
        assert_eq!(doc["_id"], "vehicle-2011-bmw-e92-m3");
        assert_eq!(doc["_type"], "vehicle");
        assert_eq!(doc["slug"]["current"], "2011-bmw-e92-m3");
        assert_eq!(doc["status"], "current");
        assert_eq!(doc["isLive"], true);
        assert_eq!(doc["showCallForPrice"], false);
    }

    #[test]
    fn absent_optionals_are_omitted_not_null() {
        let mut v = record();
        v.transmission = None;
        v.listing_price = None;
        let doc = build_vehicle_document(&v, &ImageRefs::default());
        let obj = doc.as_object().unwrap();
        assert!(!obj.contains_key("transmission"));
        assert!(!obj.contains_key("listingPrice"));
        assert!(!obj.contains_key("signatureShot"));
        assert!(!obj.contains_key("galleryExterior"));
    }

    #[test]
    fn engine_code_wrapped_in_array() {
        let doc = build_vehicle_document(&record(), &ImageRefs::default());
        assert_eq!(doc["engineCodes"], serde_json::json!(["S65"]));
    }

    #[test]
    fn signature_shot_is_an_asset_reference() {
        let refs = ImageRefs {
            signature_shot: Some("image-sig-1".to_string()),
            gallery: Vec::new(),
        };
        let doc = build_vehicle_document(&record(), &refs);
        assert_eq!(doc["signatureShot"]["_type"], "image");
        assert_eq!(doc["signatureShot"]["asset"]["_ref"], "image-sig-1");
    }

    #[test]
    fn gallery_split_into_category_buckets() {
        let refs = ImageRefs {
            signature_shot: None,
            gallery: vec![
                GalleryRef { asset_id: "image-a".to_string(), category: ImageCategory::Exterior },
                GalleryRef { asset_id: "image-b".to_string(), category: ImageCategory::Exterior },
                GalleryRef { asset_id: "image-c".to_string(), category: ImageCategory::Engine },
                GalleryRef { asset_id: "image-d".to_string(), category: ImageCategory::Misc },
            ],
        };
        let doc = build_vehicle_document(&record(), &refs);
        assert_eq!(doc["galleryExterior"].as_array().unwrap().len(), 2);
        assert_eq!(doc["galleryEngine"].as_array().unwrap().len(), 1);
        assert_eq!(doc["galleryMisc"].as_array().unwrap().len(), 1);
        assert!(doc.get("galleryInterior").is_none());
        let first = &doc["galleryExterior"][0];
        assert_eq!(first["asset"]["_ref"], "image-a");
        assert!(first["_key"].as_str().unwrap().starts_with("img-"));
    }

    #[test]
    fn content_sections_rendered_as_portable_text() {
        let doc = build_vehicle_document(&record(), &ImageRefs::default());
        assert_eq!(doc["highlights"][0]["listItem"], "bullet");
        assert_eq!(doc["overview"][0]["children"][0]["text"], "A well-kept example.");
        assert!(doc.get("history").is_none());
    }

    #[test]
    fn status_tag_priority() {
        assert_eq!(
            status_tag(&["New Arrival".to_string(), "Sold".to_string()]),
            Some("New Arrival")
        );
        assert_eq!(status_tag(&["Price Reduced".to_string()]), Some("Reduced Price"));
        assert_eq!(status_tag(&["SOLD".to_string()]), Some("Sold"));
        assert_eq!(status_tag(&["Featured".to_string()]), None);
        assert_eq!(status_tag(&[]), None);
    }

    #[test]
    fn resyncing_same_record_is_deterministic() {
        let a = build_vehicle_document(&record(), &ImageRefs::default());
        let b = build_vehicle_document(&record(), &ImageRefs::default());
        assert_eq!(a, b);
    }
}
