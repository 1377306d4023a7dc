//! Reconciles a scraped [`CandidateRecord`] with the prior content document.
//!
//! The merge is a pure function: it never performs I/O and never fails. A
//! missing or malformed prior document is passed in as
//! [`ContentDocument::default()`].

pub mod rules;

use chrono::{DateTime, Utc};

use crate::domain::content::{IMAGE_PREFIX, MAX_GALLERY, MAX_SECTIONS};
use crate::domain::{CandidateRecord, ContentDocument, ScrapeMeta, Section, Text};
use crate::extractor::{is_social_address, MessagingContact, SocialIdentity};

pub use rules::{prefer, Evidence, FieldRule, Policy, FIELD_RULES};

impl Evidence {
    /// Derive the competing values from a candidate record scraped from `source`.
    pub fn from_candidate(candidate: &CandidateRecord, source: &str) -> Self {
        let from_social = is_social_address(source);
        let identity = if from_social {
            SocialIdentity::from_title(&candidate.title)
        } else {
            None
        };
        let contact = MessagingContact::parse(&candidate.messaging_link);

        let title = Text::new(&candidate.title);
        let brand_name = identity
            .and_then(|id| Text::new(&id.name))
            .or_else(|| title.clone());
        let social_url = if from_social {
            Text::new(source)
        } else {
            Text::new(&candidate.social_url)
        };

        Self {
            title,
            description: Text::new(&candidate.description),
            headline: Text::new(&candidate.headline),
            subheadline: Text::new(&candidate.subheadline),
            brand_name,
            messaging_number: Text::new(&contact.number),
            messaging_text: Text::new(&contact.text),
            social_url,
        }
    }
}

/// Merge with the current time as the scrape timestamp.
pub fn merge(
    existing: &ContentDocument,
    candidate: &CandidateRecord,
    downloaded: &[String],
    source: &str,
    overwrite: bool,
) -> ContentDocument {
    merge_at(existing, candidate, downloaded, source, overwrite, Utc::now())
}

pub fn merge_at(
    existing: &ContentDocument,
    candidate: &CandidateRecord,
    downloaded: &[String],
    source: &str,
    overwrite: bool,
    scraped_at: DateTime<Utc>,
) -> ContentDocument {
    let evidence = Evidence::from_candidate(candidate, source);
    let mut out = ContentDocument::default();

    for rule in FIELD_RULES {
        rule.apply(existing, &evidence, &mut out, overwrite);
    }

    // A fresh download always beats a stale path reference.
    out.media.hero_image = match downloaded.first() {
        Some(file) => format!("{}{}", IMAGE_PREFIX, file),
        None => prefer(Text::new(&existing.media.hero_image), None, "", overwrite),
    };
    out.media.gallery = downloaded
        .iter()
        .skip(1)
        .take(MAX_GALLERY)
        .map(|file| format!("{}{}", IMAGE_PREFIX, file))
        .collect();

    out.sections = merge_sections(&existing.sections, &candidate.sections, overwrite);
    out.scrape = Some(ScrapeMeta::new(source, scraped_at, overwrite));

    out
}

fn merge_sections(existing: &[Section], scraped: &[Section], overwrite: bool) -> Vec<Section> {
    let chosen = match (overwrite, existing.is_empty(), scraped.is_empty()) {
        (true, _, false) => scraped,
        (true, _, true) => existing,
        (false, false, _) => existing,
        (false, true, _) => scraped,
    };
    chosen.iter().take(MAX_SECTIONS).map(Section::capped).collect()
}
