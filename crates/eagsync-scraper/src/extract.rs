//! Heuristic field extraction from listing-page markup.
//!
//! The live site is a visual page builder, not an API, so every function
//! here is a best-effort heuristic over class-name substrings and text
//! patterns. Extraction is pure — a parsed document in, partial values out —
//! and degrades to absence (`None` / empty) rather than erroring when the
//! page structure does not match. See [`crate::transform`] for how these
//! compose into a full record.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use eagsync_core::vehicle::{GalleryImage, ImageCategory, VehicleStatus, MAX_GALLERY_IMAGES};

/// Normalized visible text of an element: all text nodes concatenated with
/// whitespace runs collapsed to single spaces.
fn element_text(el: &ElementRef) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercased `class` attribute of an element, or empty.
fn class_attr(el: &ElementRef) -> String {
    el.value().attr("class").unwrap_or_default().to_lowercase()
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

/// Extracts the first 4-digit year in the 1900–2099 range from a title.
#[must_use]
pub fn extract_year(title: &str) -> Option<i32> {
    let re = Regex::new(r"\b(19|20)\d{2}\b").expect("valid year regex");
    re.find(title).and_then(|m| m.as_str().parse().ok())
}

/// Extracts a chassis code from a title (e.g. `E92`, `F80`, `G82`, `X5`).
///
/// Patterns are tried in a fixed order and the first match wins,
/// case-insensitive, normalized to uppercase.
#[must_use]
pub fn extract_chassis(title: &str) -> Option<String> {
    let patterns = [
        r"(?i)\bE\d{2,3}\b",
        r"(?i)\bF\d{2,3}\b",
        r"(?i)\bG\d{2,3}\b",
        r"(?i)\bX\d\b",
    ];
    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid chassis regex");
        if let Some(m) = re.find(title) {
            return Some(m.as_str().to_uppercase());
        }
    }
    None
}

/// Extracts a performance model from a title (e.g. `M3`, `Z8`, `330i`).
/// First matching pattern wins.
#[must_use]
pub fn extract_model(title: &str) -> Option<String> {
    let patterns = [
        r"(?i)\bM\d\b",
        r"(?i)\bM\d\s+\w+\b",
        r"(?i)\bZ\d\b",
        r"(?i)\b\d+i\b",
    ];
    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid model regex");
        if let Some(m) = re.find(title) {
            return Some(m.as_str().trim().to_string());
        }
    }
    None
}

/// Parses a displayed price into `(listing_price, show_call_for_price)`.
///
/// Any text containing a case-insensitive `call` token means the price is
/// hidden, as does text with no digits at all; both yield `(None, true)`.
#[must_use]
pub fn parse_price(price_text: &str) -> (Option<i64>, bool) {
    if price_text.trim().is_empty() {
        return (None, true);
    }
    if price_text.to_lowercase().contains("call") {
        return (None, true);
    }

    let re = Regex::new(r"\$?([\d,]+)").expect("valid price regex");
    if let Some(caps) = re.captures(price_text) {
        if let Ok(price) = caps[1].replace(',', "").parse::<i64>() {
            return (Some(price), false);
        }
    }
    (None, true)
}

/// Parses a mileage text like `"45,231 miles"` into an integer.
#[must_use]
pub fn parse_mileage(mileage_text: &str) -> Option<i64> {
    let re = Regex::new(r"([\d,]+)").expect("valid mileage regex");
    re.captures(mileage_text)
        .and_then(|caps| caps[1].replace(',', "").parse::<i64>().ok())
}

/// Page title: first non-empty `h1`, falling back to the `og:title` meta tag.
#[must_use]
pub fn extract_title(doc: &Html) -> Option<String> {
    let h1 = selector("h1");
    for el in doc.select(&h1) {
        let text = element_text(&el);
        if !text.is_empty() {
            return Some(text);
        }
    }
    meta_content(doc, "og:title")
}

/// Content of a `<meta property=...>` tag, trimmed, if present and non-empty.
#[must_use]
pub fn meta_content(doc: &Html, property: &str) -> Option<String> {
    let sel = selector(&format!(r#"meta[property="{property}"]"#));
    doc.select(&sel)
        .find_map(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Content of a `<meta name=...>` tag, trimmed, if present and non-empty.
#[must_use]
pub fn meta_named(doc: &Html, name: &str) -> Option<String> {
    let sel = selector(&format!(r#"meta[name="{name}"]"#));
    doc.select(&sel)
        .find_map(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Displayed price text: first `div`/`span` whose class contains `price`.
#[must_use]
pub fn extract_price_text(doc: &Html) -> Option<String> {
    let sel = selector("div, span");
    doc.select(&sel)
        .find(|el| class_attr(el).contains("price"))
        .map(|el| element_text(&el))
        .filter(|s| !s.is_empty())
}

/// Collects badge texts: elements whose class contains `badge` or `tag`, or
/// carries an exact `label` / `status-badge` class token. De-duplicated by
/// exact text, document order preserved.
#[must_use]
pub fn extract_badges(doc: &Html) -> Vec<String> {
    let sel = selector("*");
    let mut badges: Vec<String> = Vec::new();

    for el in doc.select(&sel) {
        let class = class_attr(&el);
        if class.is_empty() {
            continue;
        }
        let badge_like = class.contains("badge")
            || class.contains("tag")
            || el
                .value()
                .classes()
                .any(|c| c.eq_ignore_ascii_case("label") || c.eq_ignore_ascii_case("status-badge"));
        if !badge_like {
            continue;
        }
        let text = element_text(&el);
        if !text.is_empty() && !badges.contains(&text) {
            badges.push(text);
        }
    }
    badges
}

/// Derives the listing status from badge text, case-insensitive, priority
/// order: `sold` wins over `pending`, anything else is current inventory.
#[must_use]
pub fn derive_status(badges: &[String]) -> VehicleStatus {
    let badge_text = badges.join(" ").to_lowercase();
    if badge_text.contains("sold") {
        VehicleStatus::Sold
    } else if badge_text.contains("pending") {
        VehicleStatus::SalePending
    } else {
        VehicleStatus::Current
    }
}

/// Label/value pairs pulled from specification sections, mapped onto the
/// recognized fields. Unrecognized labels are dropped silently.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Specifications {
    pub vin: Option<String>,
    pub stock_number: Option<String>,
    pub mileage: Option<i64>,
    pub transmission: Option<String>,
    pub engine_code: Option<String>,
    pub engine_size: Option<String>,
    pub exterior_color: Option<String>,
    pub interior_color: Option<String>,
}

/// Scans `div`/`section` elements whose class contains `spec` or `detail`,
/// pairing each label element (class contains `label`) with its next sibling
/// element, or failing that the next `dd`/`span`/`div` after it in document
/// order. Later occurrences of the same label overwrite earlier ones.
#[must_use]
pub fn extract_specifications(doc: &Html) -> Specifications {
    let section_sel = selector("div, section");
    let mut specs = Specifications::default();

    for section in doc.select(&section_sel) {
        let class = class_attr(&section);
        if !(class.contains("spec") || class.contains("detail")) {
            continue;
        }

        let labels: Vec<ElementRef> = section
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| {
                matches!(el.value().name(), "dt" | "label" | "div")
                    && class_attr(el).contains("label")
            })
            .collect();

        for label in labels {
            let Some(value) = label_value(section, label) else {
                continue;
            };
            let label_text = element_text(&label).to_lowercase();

            if label_text.contains("vin") {
                specs.vin = Some(value);
            } else if label_text.contains("stock") {
                specs.stock_number = Some(value);
            } else if label_text.contains("mileage") || label_text.contains("miles") {
                specs.mileage = parse_mileage(&value);
            } else if label_text.contains("transmission") {
                specs.transmission = Some(value);
            } else if label_text.contains("engine") && label_text.contains("code") {
                specs.engine_code = Some(value);
            } else if label_text.contains("engine") && label_text.contains("size") {
                specs.engine_size = Some(value);
            } else if label_text.contains("exterior") && label_text.contains("color") {
                specs.exterior_color = Some(value);
            } else if label_text.contains("interior") && label_text.contains("color") {
                specs.interior_color = Some(value);
            }
        }
    }
    specs
}

/// Value for a spec label: its next sibling element's text, else the text of
/// the next `dd`/`span`/`div` after the label (outside its own subtree) in
/// the section's document order.
fn label_value(section: ElementRef, label: ElementRef) -> Option<String> {
    if let Some(sibling) = label.next_siblings().find_map(ElementRef::wrap) {
        let text = element_text(&sibling);
        if !text.is_empty() {
            return Some(text);
        }
    }

    let mut past_label = false;
    for el in section.descendants().filter_map(ElementRef::wrap) {
        if el.id() == label.id() {
            past_label = true;
            continue;
        }
        if !past_label || el.ancestors().any(|n| n.id() == label.id()) {
            continue;
        }
        if matches!(el.value().name(), "dd" | "span" | "div") {
            let text = element_text(&el);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Free-text sections harvested from the page body.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ContentSections {
    /// Ordered list items, kept verbatim.
    pub highlights: Vec<String>,
    pub overview: String,
    pub history: String,
    pub eag_impressions: String,
}

/// Keyword groups for [`extract_content_sections`], in lookup order within
/// each group. The first keyword whose heading yields any content wins and
/// the remaining keywords in that group are skipped.
const HIGHLIGHT_KEYWORDS: [&str; 3] = ["highlights", "features", "key features"];
const OVERVIEW_KEYWORDS: [&str; 3] = ["overview", "description", "about"];
const HISTORY_KEYWORDS: [&str; 3] = ["history", "service history", "ownership"];
const IMPRESSIONS_KEYWORDS: [&str; 3] = ["eag impressions", "impressions", "our take"];

/// Locates each content section by heading keyword and collects the sibling
/// elements that follow the heading until the next heading: `ul` items become
/// list entries, paragraphs become text joined with blank lines.
#[must_use]
pub fn extract_content_sections(doc: &Html) -> ContentSections {
    ContentSections {
        highlights: section_parts(doc, &HIGHLIGHT_KEYWORDS),
        overview: section_parts(doc, &OVERVIEW_KEYWORDS).join("\n\n"),
        history: section_parts(doc, &HISTORY_KEYWORDS).join("\n\n"),
        eag_impressions: section_parts(doc, &IMPRESSIONS_KEYWORDS).join("\n\n"),
    }
}

fn section_parts(doc: &Html, keywords: &[&str]) -> Vec<String> {
    let heading_sel = selector("h2, h3, h4");

    for keyword in keywords {
        let heading = doc
            .select(&heading_sel)
            .find(|h| element_text(h).to_lowercase().contains(keyword));
        let Some(heading) = heading else {
            continue;
        };

        let mut parts: Vec<String> = Vec::new();
        for sibling in heading.next_siblings().filter_map(ElementRef::wrap) {
            match sibling.value().name() {
                "h2" | "h3" | "h4" => break,
                "ul" => {
                    let li_sel = selector("li");
                    for li in sibling.select(&li_sel) {
                        let text = element_text(&li);
                        if !text.is_empty() {
                            parts.push(text);
                        }
                    }
                }
                "p" => {
                    let text = element_text(&sibling);
                    if !text.is_empty() {
                        parts.push(text);
                    }
                }
                _ => {}
            }
        }

        if !parts.is_empty() {
            return parts;
        }
    }
    Vec::new()
}

/// Harvests gallery images: `img` descendants of sections whose class
/// contains `gallery`, capped at [`MAX_GALLERY_IMAGES`] across all sections,
/// skipping exact-URL duplicates. Each image's category comes from a
/// substring search over its section's serialized content, checked in the
/// order exterior → interior → engine, defaulting to misc.
///
/// URLs are resolved against `base_url`; `local_path` is left unset for the
/// downloader to fill in.
#[must_use]
pub fn extract_gallery(doc: &Html, base_url: &str) -> Vec<GalleryImage> {
    use std::collections::HashSet;

    let section_sel = selector("div, section");
    let img_sel = selector("img");
    let mut gallery: Vec<GalleryImage> = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();

    for section in doc.select(&section_sel) {
        if !class_attr(&section).contains("gallery") {
            continue;
        }

        let section_content = section.html().to_lowercase();
        let category = if section_content.contains("exterior") {
            ImageCategory::Exterior
        } else if section_content.contains("interior") {
            ImageCategory::Interior
        } else if section_content.contains("engine") {
            ImageCategory::Engine
        } else {
            ImageCategory::Misc
        };

        for img in section.select(&img_sel) {
            if gallery.len() >= MAX_GALLERY_IMAGES {
                break;
            }
            let Some(raw_url) = image_source(&img) else {
                continue;
            };
            let Some(url) = absolutize(base_url, &raw_url) else {
                continue;
            };
            if !seen_urls.insert(url.clone()) {
                continue;
            }
            gallery.push(GalleryImage {
                url,
                local_path: None,
                category,
            });
        }

        if gallery.len() >= MAX_GALLERY_IMAGES {
            break;
        }
    }
    gallery
}

/// Image URL from `src`, falling back to `data-src`, then the first `srcset`
/// candidate.
fn image_source(img: &ElementRef) -> Option<String> {
    let value = img.value();
    if let Some(src) = value.attr("src").filter(|s| !s.is_empty()) {
        return Some(src.to_string());
    }
    if let Some(src) = value.attr("data-src").filter(|s| !s.is_empty()) {
        return Some(src.to_string());
    }
    value
        .attr("srcset")
        .and_then(|srcset| srcset.split(',').next())
        .and_then(|candidate| candidate.split_whitespace().next())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Resolves a possibly-relative URL against the site base.
#[must_use]
pub fn absolutize(base_url: &str, href: &str) -> Option<String> {
    let base = reqwest::Url::parse(base_url).ok()?;
    base.join(href).ok().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // title-text extractors
    // -----------------------------------------------------------------------

    #[test]
    fn year_extracted_from_title() {
        assert_eq!(extract_year("2011 BMW E92 M3"), Some(2011));
    }

    #[test]
    fn year_ignores_out_of_range_numbers() {
        assert_eq!(extract_year("BMW 2525 Concept"), None);
        assert_eq!(extract_year("1988 BMW E30 M3"), Some(1988));
    }

    #[test]
    fn year_absent_when_no_digits() {
        assert_eq!(extract_year("BMW M3"), None);
    }

    #[test]
    fn chassis_first_pattern_wins() {
        assert_eq!(extract_chassis("2011 BMW E92 M3").as_deref(), Some("E92"));
        assert_eq!(extract_chassis("2021 BMW G82 M4").as_deref(), Some("G82"));
        assert_eq!(extract_chassis("2005 BMW X5 4.8is").as_deref(), Some("X5"));
    }

    #[test]
    fn chassis_normalized_to_uppercase() {
        assert_eq!(extract_chassis("bmw e36 m3 sedan").as_deref(), Some("E36"));
    }

    #[test]
    fn chassis_absent_when_no_code() {
        assert_eq!(extract_chassis("2011 BMW M3"), None);
    }

    #[test]
    fn model_plain_m_number() {
        assert_eq!(extract_model("2011 BMW E92 M3").as_deref(), Some("M3"));
    }

    #[test]
    fn model_z_and_numeric_lines() {
        assert_eq!(extract_model("2000 BMW Z8").as_deref(), Some("Z8"));
        assert_eq!(extract_model("2019 BMW 330i").as_deref(), Some("330i"));
    }

    // -----------------------------------------------------------------------
    // parse_price / parse_mileage
    // -----------------------------------------------------------------------

    #[test]
    fn price_with_dollar_and_commas() {
        assert_eq!(parse_price("$12,345"), (Some(12_345), false));
    }

    #[test]
    fn price_without_symbol() {
        assert_eq!(parse_price("45000"), (Some(45_000), false));
    }

    #[test]
    fn price_call_for_price_any_case() {
        assert_eq!(parse_price("Call for price"), (None, true));
        assert_eq!(parse_price("CALL"), (None, true));
        assert_eq!(parse_price("Please call us"), (None, true));
    }

    #[test]
    fn price_no_digits_falls_back_to_call() {
        assert_eq!(parse_price("Inquire"), (None, true));
        assert_eq!(parse_price(""), (None, true));
        assert_eq!(parse_price("   "), (None, true));
    }

    #[test]
    fn mileage_with_commas_and_suffix() {
        assert_eq!(parse_mileage("45,231 miles"), Some(45_231));
    }

    #[test]
    fn mileage_absent_without_digits() {
        assert_eq!(parse_mileage("TMU"), None);
        assert_eq!(parse_mileage(""), None);
    }

    // -----------------------------------------------------------------------
    // DOM extractors
    // -----------------------------------------------------------------------

    #[test]
    fn title_prefers_h1_over_meta() {
        let doc = Html::parse_document(
            r#"<html><head><meta property="og:title" content="Meta Title"></head>
               <body><h1>2011 BMW E92 M3</h1></body></html>"#,
        );
        assert_eq!(extract_title(&doc).as_deref(), Some("2011 BMW E92 M3"));
    }

    #[test]
    fn title_falls_back_to_og_title() {
        let doc = Html::parse_document(
            r#"<html><head><meta property="og:title" content="Meta Title"></head>
               <body><h1>  </h1></body></html>"#,
        );
        assert_eq!(extract_title(&doc).as_deref(), Some("Meta Title"));
    }

    #[test]
    fn price_text_from_price_classed_element() {
        let doc = Html::parse_document(
            r#"<div class="vehicle-price-display">$45,000</div>"#,
        );
        assert_eq!(extract_price_text(&doc).as_deref(), Some("$45,000"));
    }

    #[test]
    fn badges_deduplicated_in_document_order() {
        let doc = Html::parse_document(
            r#"<div class="status-badge">Sold</div>
               <span class="inventory-tag">New Arrival</span>
               <div class="status-badge">Sold</div>"#,
        );
        assert_eq!(extract_badges(&doc), vec!["Sold", "New Arrival"]);
    }

    #[test]
    fn badges_ignore_unrelated_classes() {
        let doc = Html::parse_document(r#"<div class="hero-section">Not a badge</div>"#);
        assert!(extract_badges(&doc).is_empty());
    }

    #[test]
    fn status_priority_sold_over_pending() {
        let badges = vec!["Sale Pending".to_string(), "SOLD".to_string()];
        assert_eq!(derive_status(&badges), VehicleStatus::Sold);
    }

    #[test]
    fn status_pending_detected() {
        let badges = vec!["Sale Pending".to_string()];
        assert_eq!(derive_status(&badges), VehicleStatus::SalePending);
    }

    #[test]
    fn status_defaults_to_current() {
        assert_eq!(derive_status(&[]), VehicleStatus::Current);
        let badges = vec!["New Arrival".to_string()];
        assert_eq!(derive_status(&badges), VehicleStatus::Current);
    }

    #[test]
    fn specifications_label_sibling_pairs() {
        let doc = Html::parse_document(
            r#"<section class="vehicle-specs">
                 <div class="spec-label">VIN</div><div>WBSKG9C50BE123456</div>
                 <div class="spec-label">Stock Number</div><div>EAG2041</div>
                 <div class="spec-label">Mileage</div><div>45,231 miles</div>
                 <div class="spec-label">Transmission</div><div>6-Speed Manual</div>
                 <div class="spec-label">Engine Code</div><div>S65</div>
                 <div class="spec-label">Engine Size</div><div>4.0L</div>
                 <div class="spec-label">Exterior Color</div><div>Alpine White</div>
                 <div class="spec-label">Interior Color</div><div>Fox Red</div>
               </section>"#,
        );
        let specs = extract_specifications(&doc);
        assert_eq!(specs.vin.as_deref(), Some("WBSKG9C50BE123456"));
        assert_eq!(specs.stock_number.as_deref(), Some("EAG2041"));
        assert_eq!(specs.mileage, Some(45_231));
        assert_eq!(specs.transmission.as_deref(), Some("6-Speed Manual"));
        assert_eq!(specs.engine_code.as_deref(), Some("S65"));
        assert_eq!(specs.engine_size.as_deref(), Some("4.0L"));
        assert_eq!(specs.exterior_color.as_deref(), Some("Alpine White"));
        assert_eq!(specs.interior_color.as_deref(), Some("Fox Red"));
    }

    #[test]
    fn specifications_unrecognized_labels_dropped() {
        let doc = Html::parse_document(
            r#"<div class="detail-panel">
                 <dt class="label">Warranty</dt><dd>None</dd>
                 <dt class="label">VIN</dt><dd>WBS123</dd>
               </div>"#,
        );
        let specs = extract_specifications(&doc);
        assert_eq!(specs.vin.as_deref(), Some("WBS123"));
        assert!(specs.transmission.is_none());
    }

    #[test]
    fn specifications_ignore_sections_without_spec_class() {
        let doc = Html::parse_document(
            r#"<div class="hero"><div class="spec-label">VIN</div><div>WBS123</div></div>"#,
        );
        assert_eq!(extract_specifications(&doc), Specifications::default());
    }

    #[test]
    fn content_sections_lists_and_paragraphs() {
        let doc = Html::parse_document(
            r#"<div>
                 <h2>Highlights</h2>
                 <ul><li>Competition Package</li><li>Carbon Roof</li></ul>
                 <h2>Overview</h2>
                 <p>First paragraph.</p>
                 <p>Second paragraph.</p>
                 <h3>Service History</h3>
                 <p>Full records.</p>
                 <h3>Our Take</h3>
                 <p>A special car.</p>
               </div>"#,
        );
        let content = extract_content_sections(&doc);
        assert_eq!(content.highlights, vec!["Competition Package", "Carbon Roof"]);
        assert_eq!(content.overview, "First paragraph.\n\nSecond paragraph.");
        assert_eq!(content.history, "Full records.");
        assert_eq!(content.eag_impressions, "A special car.");
    }

    #[test]
    fn content_sections_stop_at_next_heading() {
        let doc = Html::parse_document(
            r#"<div>
                 <h2>Overview</h2>
                 <p>Belongs to overview.</p>
                 <h2>History</h2>
                 <p>Belongs to history.</p>
               </div>"#,
        );
        let content = extract_content_sections(&doc);
        assert_eq!(content.overview, "Belongs to overview.");
        assert_eq!(content.history, "Belongs to history.");
    }

    #[test]
    fn content_sections_first_keyword_with_content_wins() {
        // "Features" has content, so the empty "Highlights" heading loses.
        let doc = Html::parse_document(
            r#"<div>
                 <h2>Highlights</h2>
                 <h2>Features</h2>
                 <ul><li>Sunroof</li></ul>
               </div>"#,
        );
        let content = extract_content_sections(&doc);
        assert_eq!(content.highlights, vec!["Sunroof"]);
    }

    #[test]
    fn content_sections_absent_headings_yield_empty() {
        let doc = Html::parse_document("<div><p>No headings here.</p></div>");
        let content = extract_content_sections(&doc);
        assert!(content.highlights.is_empty());
        assert!(content.overview.is_empty());
        assert!(content.history.is_empty());
        assert!(content.eag_impressions.is_empty());
    }

    #[test]
    fn gallery_categorized_by_section_content() {
        let doc = Html::parse_document(
            r#"<div class="gallery-exterior">
                 <img src="/img/ext-1.jpg"><img src="/img/ext-2.jpg">
               </div>
               <div class="gallery-cabin">
                 <h3>Interior</h3>
                 <img src="/img/int-1.jpg">
               </div>
               <div class="gallery-bay">
                 <p>Engine bay</p>
                 <img src="/img/eng-1.jpg">
               </div>
               <div class="gallery-other">
                 <img src="/img/other-1.jpg">
               </div>"#,
        );
        let gallery = extract_gallery(&doc, "https://www.example.com");
        assert_eq!(gallery.len(), 5);
        assert_eq!(gallery[0].url, "https://www.example.com/img/ext-1.jpg");
        assert_eq!(gallery[0].category, ImageCategory::Exterior);
        assert_eq!(gallery[2].category, ImageCategory::Interior);
        assert_eq!(gallery[3].category, ImageCategory::Engine);
        assert_eq!(gallery[4].category, ImageCategory::Misc);
    }

    #[test]
    fn gallery_skips_duplicate_urls() {
        let doc = Html::parse_document(
            r#"<div class="gallery">
                 <img src="/img/a.jpg"><img src="/img/a.jpg"><img src="/img/b.jpg">
               </div>"#,
        );
        let gallery = extract_gallery(&doc, "https://www.example.com");
        assert_eq!(gallery.len(), 2);
    }

    #[test]
    fn gallery_cap_is_global_across_sections() {
        let imgs_a: String = (0..15).map(|i| format!(r#"<img src="/a{i}.jpg">"#)).collect();
        let imgs_b: String = (0..15).map(|i| format!(r#"<img src="/b{i}.jpg">"#)).collect();
        let html = format!(
            r#"<div class="gallery">{imgs_a}</div><div class="gallery">{imgs_b}</div>"#
        );
        let doc = Html::parse_document(&html);
        let gallery = extract_gallery(&doc, "https://www.example.com");
        assert_eq!(gallery.len(), MAX_GALLERY_IMAGES);
    }

    #[test]
    fn gallery_honors_data_src_and_srcset_fallbacks() {
        let doc = Html::parse_document(
            r#"<div class="gallery">
                 <img data-src="/lazy.jpg">
                 <img srcset="/small.jpg 480w, /large.jpg 1080w">
               </div>"#,
        );
        let gallery = extract_gallery(&doc, "https://www.example.com");
        assert_eq!(gallery[0].url, "https://www.example.com/lazy.jpg");
        assert_eq!(gallery[1].url, "https://www.example.com/small.jpg");
    }

    #[test]
    fn absolutize_joins_relative_and_keeps_absolute() {
        assert_eq!(
            absolutize("https://www.example.com", "/img/a.jpg").as_deref(),
            Some("https://www.example.com/img/a.jpg")
        );
        assert_eq!(
            absolutize("https://www.example.com", "https://cdn.example.com/a.jpg").as_deref(),
            Some("https://cdn.example.com/a.jpg")
        );
    }
}
