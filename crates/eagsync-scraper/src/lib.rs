pub mod client;
pub mod error;
pub mod extract;
pub mod listing;
pub mod story;
pub mod transform;

pub use client::SiteClient;
pub use error::ScraperError;
pub use listing::{DiscoveredLink, StatusFilter};
pub use transform::{scrape_story, scrape_vehicle, ScrapeOptions};
