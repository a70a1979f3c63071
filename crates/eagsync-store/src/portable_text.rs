//! Conversion of plain scraped text into the store's portable text format.
//!
//! Block and span keys are content-derived (truncated SHA-256 of the trimmed
//! text), so re-syncing unchanged content produces byte-identical documents.

use serde_json::{json, Value};
use sha2::{Digest, Sha256};

/// First four bytes of the SHA-256 digest, as the 8-hex-digit key suffix.
fn content_hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let word = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    format!("{word:08x}")
}

fn span(text: &str) -> Value {
    json!({
        "_type": "span",
        "_key": format!("span-{}", content_hash(text)),
        "text": text,
        "marks": [],
    })
}

/// Converts blank-line-separated prose into portable text blocks, one block
/// per paragraph. Empty and whitespace-only paragraphs are dropped.
#[must_use]
pub fn text_to_blocks(text: &str) -> Vec<Value> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|para| !para.is_empty())
        .map(|para| {
            json!({
                "_type": "block",
                "_key": format!("block-{}", content_hash(para)),
                "style": "normal",
                "markDefs": [],
                "children": [span(para)],
            })
        })
        .collect()
}

/// Converts a list of short strings into bullet-list portable text blocks.
#[must_use]
pub fn list_to_blocks(items: &[String]) -> Vec<Value> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| {
            json!({
                "_type": "block",
                "_key": format!("block-{}", content_hash(item)),
                "style": "normal",
                "listItem": "bullet",
                "level": 1,
                "markDefs": [],
                "children": [span(item)],
            })
        })
        .collect()
}

/// 8-hex-digit content key for gallery image entries, prefixed by the caller.
#[must_use]
pub fn image_key(asset_id: &str) -> String {
    format!("img-{}", content_hash(asset_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_splits_on_blank_lines() {
        let blocks = text_to_blocks("First paragraph.\n\nSecond paragraph.");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0]["_type"], "block");
        assert_eq!(blocks[0]["style"], "normal");
        assert_eq!(blocks[0]["children"][0]["text"], "First paragraph.");
        assert_eq!(blocks[1]["children"][0]["text"], "Second paragraph.");
    }

    #[test]
    fn empty_text_yields_no_blocks() {
        assert!(text_to_blocks("").is_empty());
        assert!(text_to_blocks("\n\n  \n\n").is_empty());
    }

    #[test]
    fn keys_are_stable_for_identical_content() {
        let a = text_to_blocks("Same paragraph.");
        let b = text_to_blocks("Same paragraph.");
        assert_eq!(a[0]["_key"], b[0]["_key"]);
        assert_eq!(a[0]["children"][0]["_key"], b[0]["children"][0]["_key"]);
    }

    #[test]
    fn keys_differ_for_different_content() {
        let a = text_to_blocks("One paragraph.");
        let b = text_to_blocks("Another paragraph.");
        assert_ne!(a[0]["_key"], b[0]["_key"]);
    }

    #[test]
    fn key_shape_is_prefixed_hex() {
        let blocks = text_to_blocks("Keyed.");
        let key = blocks[0]["_key"].as_str().unwrap();
        assert!(key.starts_with("block-"));
        assert_eq!(key.len(), "block-".len() + 8);
        assert!(key["block-".len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn list_items_become_bullet_blocks() {
        let items = vec!["Competition Package".to_string(), "Carbon Roof".to_string()];
        let blocks = list_to_blocks(&items);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0]["listItem"], "bullet");
        assert_eq!(blocks[0]["level"], 1);
        assert_eq!(blocks[1]["children"][0]["text"], "Carbon Roof");
    }

    #[test]
    fn list_skips_blank_items() {
        let items = vec![String::new(), "  ".to_string(), "Real".to_string()];
        assert_eq!(list_to_blocks(&items).len(), 1);
    }

    #[test]
    fn image_key_shape() {
        let key = image_key("image-abc123");
        assert!(key.starts_with("img-"));
        assert_eq!(key.len(), 12);
    }
}
