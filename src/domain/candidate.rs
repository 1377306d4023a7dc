use serde::Serialize;

use crate::domain::content::Section;

/// Content candidates pulled out of a scraped page, before merging.
///
/// Text fields are whitespace-normalized and empty when nothing was found.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub title: String,
    pub description: String,
    pub headline: String,
    pub subheadline: String,
    pub sections: Vec<Section>,
    pub social_url: String,
    /// Raw messaging deep link, parsed later by the merger.
    pub messaging_link: String,
    /// Absolute image URLs in first-seen order.
    pub image_urls: Vec<String>,
}
