//! JSON snapshot envelopes written by the scrape steps and consumed by the
//! sync and compare steps.
//!
//! The envelopes must round-trip exactly: any record the page transformer
//! produces deserializes back into an equivalent record.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::story::StoryRecord;
use crate::vehicle::VehicleRecord;

/// Top-level document of the inventory snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySnapshot {
    /// RFC 3339 timestamp of when the scrape ran.
    pub scraped_at: String,
    /// Listing page the scrape started from.
    pub source_url: String,
    pub total_vehicles: usize,
    pub vehicles: Vec<VehicleRecord>,
}

impl InventorySnapshot {
    /// Wraps scraped vehicles in an envelope stamped with the current time.
    #[must_use]
    pub fn new(source_url: impl Into<String>, vehicles: Vec<VehicleRecord>) -> Self {
        Self {
            scraped_at: Utc::now().to_rfc3339(),
            source_url: source_url.into(),
            total_vehicles: vehicles.len(),
            vehicles,
        }
    }
}

/// Top-level document of the blog story snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorySnapshot {
    pub extracted_at: String,
    pub source_url: String,
    pub total_stories: usize,
    pub stories: Vec<StoryRecord>,
}

impl StorySnapshot {
    /// Wraps extracted stories in an envelope stamped with the current time.
    #[must_use]
    pub fn new(source_url: impl Into<String>, stories: Vec<StoryRecord>) -> Self {
        Self {
            extracted_at: Utc::now().to_rfc3339(),
            source_url: source_url.into(),
            total_stories: stories.len(),
            stories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_snapshot_counts_vehicles() {
        let vehicles = vec![
            VehicleRecord::new("a", "https://example.com/inventory/a"),
            VehicleRecord::new("b", "https://example.com/inventory/b"),
        ];
        let snap = InventorySnapshot::new("https://example.com/inventory", vehicles);
        assert_eq!(snap.total_vehicles, 2);
        assert_eq!(snap.source_url, "https://example.com/inventory");
    }

    #[test]
    fn inventory_snapshot_round_trips() {
        let snap = InventorySnapshot::new(
            "https://example.com/inventory",
            vec![VehicleRecord::new("a", "https://example.com/inventory/a")],
        );
        let json = serde_json::to_string_pretty(&snap).unwrap();
        let decoded: InventorySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.scraped_at, snap.scraped_at);
        assert_eq!(decoded.total_vehicles, 1);
        assert_eq!(decoded.vehicles[0].slug, "a");
    }

    #[test]
    fn story_snapshot_round_trips() {
        let snap = StorySnapshot::new("https://example.com/under-the-hood", vec![]);
        let json = serde_json::to_string(&snap).unwrap();
        let decoded: StorySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.total_stories, 0);
        assert_eq!(decoded.extracted_at, snap.extracted_at);
    }
}
