//! Link discovery on the inventory index and blog index pages.

use scraper::{Html, Selector};

use crate::extract::absolutize;

/// A discovered detail-page link with the slug already split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    pub slug: String,
    pub url: String,
}

/// Inventory status filter accepted on the index page query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Current,
    Sold,
    All,
}

impl StatusFilter {
    fn title_case(self) -> Option<&'static str> {
        match self {
            StatusFilter::Current => Some("Current"),
            StatusFilter::Sold => Some("Sold"),
            StatusFilter::All => None,
        }
    }
}

/// URL of the inventory index page, with the status filter applied as the
/// site's query parameter. `All` means no filter.
#[must_use]
pub fn inventory_url(base_url: &str, filter: StatusFilter) -> String {
    match filter.title_case() {
        Some(title) => format!("{base_url}/inventory?status={title}%20Inventory"),
        None => format!("{base_url}/inventory"),
    }
}

/// URL of the blog index page.
#[must_use]
pub fn blog_url(base_url: &str) -> String {
    format!("{base_url}/under-the-hood")
}

/// Collects vehicle detail-page links from inventory index markup.
///
/// A link qualifies when its `href` contains `/inventory/` but is not the
/// index page itself. The slug is the last path segment. Duplicates are
/// skipped, document order preserved.
#[must_use]
pub fn vehicle_links(html: &str, base_url: &str) -> Vec<DiscoveredLink> {
    let doc = Html::parse_document(html);
    let anchor = Selector::parse("a[href]").expect("valid selector");
    let mut links: Vec<DiscoveredLink> = Vec::new();

    for el in doc.select(&anchor) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        if !href.contains("/inventory/") || href == "/inventory" || href == "/inventory/" {
            continue;
        }
        let Some(slug) = last_segment(href) else {
            continue;
        };
        let Some(url) = absolutize(base_url, href) else {
            continue;
        };
        if links.iter().any(|l| l.url == url) {
            continue;
        }
        links.push(DiscoveredLink {
            slug: slug.to_string(),
            url,
        });
    }
    links
}

/// Collects blog story links from blog index markup: any `href` containing
/// `/under-the-hood/` other than the index itself, de-duplicated in order.
#[must_use]
pub fn story_links(html: &str, base_url: &str) -> Vec<DiscoveredLink> {
    let doc = Html::parse_document(html);
    let anchor = Selector::parse("a[href]").expect("valid selector");
    let index_url = blog_url(base_url);
    let mut links: Vec<DiscoveredLink> = Vec::new();

    for el in doc.select(&anchor) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        if !href.contains("/under-the-hood/") {
            continue;
        }
        let Some(url) = absolutize(base_url, href) else {
            continue;
        };
        if url == index_url || url.trim_end_matches('/') == index_url {
            continue;
        }
        let Some(slug) = last_segment(href) else {
            continue;
        };
        if links.iter().any(|l| l.url == url) {
            continue;
        }
        links.push(DiscoveredLink {
            slug: slug.to_string(),
            url,
        });
    }
    links
}

/// Last non-empty path segment of an href, with any trailing slash and query
/// string stripped.
fn last_segment(href: &str) -> Option<&str> {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
}
