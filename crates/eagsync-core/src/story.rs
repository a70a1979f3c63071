use serde::{Deserialize, Serialize};

/// A blog story scraped from the site's editorial section.
///
/// Stories have a lifecycle independent of vehicle records and no
/// cross-references to them. `date` is kept as the free text shown on the
/// page (e.g. `"February 20, 2025"`), not parsed to a calendar type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryRecord {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    /// All article paragraphs joined with blank lines.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub category: String,
    pub url: String,
    pub image_url: Option<String>,
    /// Relative path of the downloaded featured image, if the download
    /// succeeded.
    pub local_image: Option<String>,
}

impl StoryRecord {
    /// Fallback title derived from the slug: `-` becomes a space and each
    /// word is capitalized, e.g. `"track-day-recap"` → `"Track Day Recap"`.
    #[must_use]
    pub fn title_from_slug(slug: &str) -> String {
        slug.split('-')
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_from_slug_capitalizes_words() {
        assert_eq!(
            StoryRecord::title_from_slug("track-day-recap"),
            "Track Day Recap"
        );
    }

    #[test]
    fn title_from_slug_single_word() {
        assert_eq!(StoryRecord::title_from_slug("m3"), "M3");
    }

    #[test]
    fn title_from_slug_ignores_empty_segments() {
        assert_eq!(StoryRecord::title_from_slug("a--b"), "A B");
    }

    #[test]
    fn story_round_trips_through_json() {
        let story = StoryRecord {
            title: "Track Day Recap".to_string(),
            slug: "track-day-recap".to_string(),
            excerpt: "A day at the track.".to_string(),
            content: "First paragraph.\n\nSecond paragraph.".to_string(),
            date: "February 20, 2025".to_string(),
            category: "Events".to_string(),
            url: "https://example.com/under-the-hood/track-day-recap".to_string(),
            image_url: Some("https://example.com/track.jpg".to_string()),
            local_image: None,
        };
        let json = serde_json::to_string(&story).unwrap();
        let decoded: StoryRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.slug, story.slug);
        assert_eq!(decoded.date, story.date);
        assert_eq!(decoded.content, story.content);
        assert!(decoded.local_image.is_none());
    }
}
