//! Field extraction for blog story pages.
//!
//! Same philosophy as [`crate::extract`]: pure heuristics over markup,
//! every field optional, absence over errors.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::extract::{absolutize, meta_content, meta_named};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

fn element_text(el: &ElementRef) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Has any of the given exact class tokens.
fn has_class_token(el: &ElementRef, tokens: &[&str]) -> bool {
    el.value()
        .classes()
        .any(|c| tokens.iter().any(|t| c.eq_ignore_ascii_case(t)))
}

/// The story body container: the first `article`, falling back to the first
/// element carrying a `content`, `post-content`, or `entry-content` class.
fn content_area(doc: &Html) -> Option<ElementRef<'_>> {
    let article = selector("article");
    if let Some(el) = doc.select(&article).next() {
        return Some(el);
    }
    let any = selector("*");
    doc.select(&any)
        .find(|el| has_class_token(el, &["content", "post-content", "entry-content"]))
}

/// Story title: first non-empty `h1`, falling back to `og:title`.
#[must_use]
pub fn extract_story_title(doc: &Html) -> Option<String> {
    crate::extract::extract_title(doc)
}

/// Publication date as displayed: the first `<time>` element's text (or its
/// `datetime` attribute when the text is empty), falling back to a
/// month-name date pattern anywhere in the page text.
#[must_use]
pub fn extract_story_date(doc: &Html) -> Option<String> {
    let time_sel = selector("time");
    if let Some(time_el) = doc.select(&time_sel).next() {
        let text = element_text(&time_el);
        if !text.is_empty() {
            return Some(text);
        }
        if let Some(datetime) = time_el.value().attr("datetime") {
            if !datetime.is_empty() {
                return Some(datetime.to_string());
            }
        }
    }

    let page_text = doc
        .root_element()
        .text()
        .collect::<String>();
    date_in_text(&page_text)
}

/// First month-name date in free text, full or abbreviated month form
/// (`"February 20, 2025"`, `"Jan 30, 2025"`).
#[must_use]
pub fn date_in_text(text: &str) -> Option<String> {
    let patterns = [
        r"(?i)(January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},\s+\d{4}",
        r"(?i)(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+\d{1,2},\s+\d{4}",
    ];
    for pattern in patterns {
        let re = Regex::new(pattern).expect("valid date regex");
        if let Some(m) = re.find(text) {
            return Some(m.as_str().to_string());
        }
    }
    None
}

/// Excerpt: the `description` meta tag, then `og:description`, then the
/// first non-empty paragraph of the story body.
#[must_use]
pub fn extract_story_excerpt(doc: &Html) -> Option<String> {
    if let Some(excerpt) = meta_named(doc, "description") {
        return Some(excerpt);
    }
    if let Some(excerpt) = meta_content(doc, "og:description") {
        return Some(excerpt);
    }
    let area = content_area(doc)?;
    let p_sel = selector("p");
    area.select(&p_sel)
        .map(|p| element_text(&p))
        .find(|t| !t.is_empty())
}

/// Featured image URL, resolved against `base_url`: `og:image`, then the
/// first image in the story body, then any image on the page.
#[must_use]
pub fn extract_story_image(doc: &Html, base_url: &str) -> Option<String> {
    if let Some(url) = meta_content(doc, "og:image") {
        return absolutize(base_url, &url);
    }

    let img_sel = selector("img");
    let from_area = content_area(doc).and_then(|area| {
        area.select(&img_sel).find_map(|img| img_src(&img))
    });
    let raw = from_area.or_else(|| doc.select(&img_sel).find_map(|img| img_src(&img)))?;
    absolutize(base_url, &raw)
}

fn img_src(img: &ElementRef) -> Option<String> {
    let value = img.value();
    value
        .attr("src")
        .filter(|s| !s.is_empty())
        .or_else(|| value.attr("data-src").filter(|s| !s.is_empty()))
        .map(str::to_string)
}

/// Full body text: every non-empty paragraph of the story body joined with
/// blank lines. Empty string when no body container is found.
#[must_use]
pub fn extract_story_content(doc: &Html) -> String {
    let Some(area) = content_area(doc) else {
        return String::new();
    };
    let p_sel = selector("p");
    area.select(&p_sel)
        .map(|p| element_text(&p))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Category label: the first element carrying a `category`, `tag`, or
/// `post-category` class token.
#[must_use]
pub fn extract_story_category(doc: &Html) -> Option<String> {
    let any = selector("*");
    doc.select(&any)
        .find(|el| has_class_token(el, &["category", "tag", "post-category"]))
        .map(|el| element_text(&el))
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.enthusiastauto.com";

    fn story_page() -> Html {
        Html::parse_document(
            r#"<html>
                 <head>
                   <meta name="description" content="Why S54 rod bearings matter.">
                   <meta property="og:image" content="/images/s54-hero.jpg">
                 </head>
                 <body>
                   <h1>S54 Rod Bearings Explained</h1>
                   <span class="post-category">Maintenance</span>
                   <time datetime="2025-02-20">February 20, 2025</time>
                   <article>
                     <p>First paragraph of the story.</p>
                     <p></p>
                     <p>Second paragraph of the story.</p>
                     <img src="/images/inline.jpg">
                   </article>
                 </body>
               </html>"#,
        )
    }

    #[test]
    fn title_from_h1() {
        let doc = story_page();
        assert_eq!(
            extract_story_title(&doc).as_deref(),
            Some("S54 Rod Bearings Explained")
        );
    }

    #[test]
    fn date_from_time_element_text() {
        let doc = story_page();
        assert_eq!(extract_story_date(&doc).as_deref(), Some("February 20, 2025"));
    }

    #[test]
    fn date_falls_back_to_datetime_attribute() {
        let doc = Html::parse_document(r#"<time datetime="2025-02-20"></time>"#);
        assert_eq!(extract_story_date(&doc).as_deref(), Some("2025-02-20"));
    }

    #[test]
    fn date_falls_back_to_text_pattern() {
        let doc = Html::parse_document("<p>Posted on Jan 30, 2025 by the shop.</p>");
        assert_eq!(extract_story_date(&doc).as_deref(), Some("Jan 30, 2025"));
    }

    #[test]
    fn date_absent_when_nothing_matches() {
        let doc = Html::parse_document("<p>No date here.</p>");
        assert!(extract_story_date(&doc).is_none());
    }

    #[test]
    fn excerpt_prefers_meta_description() {
        let doc = story_page();
        assert_eq!(
            extract_story_excerpt(&doc).as_deref(),
            Some("Why S54 rod bearings matter.")
        );
    }

    #[test]
    fn excerpt_falls_back_to_first_paragraph() {
        let doc = Html::parse_document(
            "<article><p>Lead paragraph.</p><p>More text.</p></article>",
        );
        assert_eq!(extract_story_excerpt(&doc).as_deref(), Some("Lead paragraph."));
    }

    #[test]
    fn image_prefers_og_image_and_resolves_url() {
        let doc = story_page();
        assert_eq!(
            extract_story_image(&doc, BASE).as_deref(),
            Some("https://www.enthusiastauto.com/images/s54-hero.jpg")
        );
    }

    #[test]
    fn image_falls_back_to_article_img() {
        let doc = Html::parse_document(r#"<article><img src="/images/inline.jpg"></article>"#);
        assert_eq!(
            extract_story_image(&doc, BASE).as_deref(),
            Some("https://www.enthusiastauto.com/images/inline.jpg")
        );
    }

    #[test]
    fn image_falls_back_to_any_img() {
        let doc = Html::parse_document(r#"<div><img data-src="/images/anywhere.jpg"></div>"#);
        assert_eq!(
            extract_story_image(&doc, BASE).as_deref(),
            Some("https://www.enthusiastauto.com/images/anywhere.jpg")
        );
    }

    #[test]
    fn content_joins_paragraphs_with_blank_lines() {
        let doc = story_page();
        assert_eq!(
            extract_story_content(&doc),
            "First paragraph of the story.\n\nSecond paragraph of the story."
        );
    }

    #[test]
    fn content_empty_without_body_container() {
        let doc = Html::parse_document("<div><p>Stray text.</p></div>");
        assert_eq!(extract_story_content(&doc), "");
    }

    #[test]
    fn category_from_class_token() {
        let doc = story_page();
        assert_eq!(extract_story_category(&doc).as_deref(), Some("Maintenance"));
    }

    #[test]
    fn category_requires_exact_token() {
        let doc = Html::parse_document(r#"<div class="categories-nav">Nav</div>"#);
        assert!(extract_story_category(&doc).is_none());
    }
}
