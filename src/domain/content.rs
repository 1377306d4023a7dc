use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum number of sections kept in a content document.
pub const MAX_SECTIONS: usize = 5;
/// Maximum number of items per section.
pub const MAX_SECTION_ITEMS: usize = 6;
/// Maximum number of gallery images besides the hero image.
pub const MAX_GALLERY: usize = 9;
/// Media paths are relative to the template's asset directory.
pub const IMAGE_PREFIX: &str = "images/";

/// Values used when neither the prior document nor the scrape has one.
pub mod fallback {
    pub const SITE_TITLE: &str = "Landing Page";
    pub const LANGUAGE: &str = "en";
    pub const BRAND_NAME: &str = "Brand";
    pub const ACCENT_COLOR: &str = "#6d28d9";
    pub const HEADLINE: &str = "Welcome";
    pub const PRIMARY_CTA: &str = "Chat on WhatsApp";
    pub const SECONDARY_CTA: &str = "Visit Instagram";
    pub const MESSAGING_NUMBER: &str = "+91 98765 43210";
    pub const MESSAGING_TEXT: &str =
        "Hi! I came from your landing page and I'd like to know more.";
    pub const SOCIAL_URL: &str = "https://www.instagram.com/yourhandle/";
    pub const FOOTER_EMAIL: &str = "hello@example.com";
    pub const SCRAPE_NOTE: &str =
        "Drafted via scraper. Ensure you have rights to reuse any content/images.";
}

/// The persisted content model of a landing page (`landing.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentDocument {
    pub site: Site,
    pub brand: Brand,
    pub hero: Hero,
    pub media: Media,
    pub sections: Vec<Section>,
    pub footer: Footer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrape: Option<ScrapeMeta>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Site {
    pub title: String,
    pub description: String,
    pub language: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Brand {
    pub name: String,
    pub tagline: String,
    pub accent_color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Hero {
    pub headline: String,
    pub subheadline: String,
    pub primary_cta_text: String,
    #[serde(rename = "whatsappNumber")]
    pub messaging_number: String,
    #[serde(rename = "whatsappMessage")]
    pub messaging_text: String,
    pub secondary_cta_text: String,
    #[serde(rename = "instagramUrl")]
    pub social_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Media {
    pub hero_image: String,
    pub gallery: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Section {
    pub title: String,
    pub items: Vec<String>,
}

impl Section {
    pub fn new(title: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            title: title.into(),
            items,
        }
    }

    /// Copy of the section with its items capped.
    pub fn capped(&self) -> Self {
        Self {
            title: self.title.clone(),
            items: self.items.iter().take(MAX_SECTION_ITEMS).cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Footer {
    pub copyright_name: String,
    pub email: String,
}

/// Provenance of the last scrape. Regenerated on every merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeMeta {
    pub source_url: String,
    pub scraped_at: String,
    pub overwrite: bool,
    pub note: String,
}

impl ScrapeMeta {
    pub fn new(source_url: &str, scraped_at: DateTime<Utc>, overwrite: bool) -> Self {
        Self {
            source_url: source_url.to_string(),
            scraped_at: scraped_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            overwrite,
            note: fallback::SCRAPE_NOTE.to_string(),
        }
    }
}

impl ContentDocument {
    /// Read a document field by field. A value of the wrong type reads as
    /// empty without affecting its neighbours; `None` means the text is not
    /// JSON at all.
    pub fn from_json_lenient(raw: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(raw).ok()?;
        Some(Self::from_value_lenient(&value))
    }

    fn from_value_lenient(v: &Value) -> Self {
        let s = |path: &[&str]| string_at(v, path);
        Self {
            site: Site {
                title: s(&["site", "title"]),
                description: s(&["site", "description"]),
                language: s(&["site", "language"]),
            },
            brand: Brand {
                name: s(&["brand", "name"]),
                tagline: s(&["brand", "tagline"]),
                accent_color: s(&["brand", "accentColor"]),
            },
            hero: Hero {
                headline: s(&["hero", "headline"]),
                subheadline: s(&["hero", "subheadline"]),
                primary_cta_text: s(&["hero", "primaryCtaText"]),
                messaging_number: s(&["hero", "whatsappNumber"]),
                messaging_text: s(&["hero", "whatsappMessage"]),
                secondary_cta_text: s(&["hero", "secondaryCtaText"]),
                social_url: s(&["hero", "instagramUrl"]),
            },
            media: Media {
                hero_image: s(&["media", "heroImage"]),
                gallery: strings_at(v, &["media", "gallery"]),
            },
            sections: value_at(v, &["sections"])
                .and_then(Value::as_array)
                .map(|sections| {
                    sections
                        .iter()
                        .filter(|section| section.is_object())
                        .map(|section| {
                            Section::new(
                                string_at(section, &["title"]),
                                strings_at(section, &["items"]),
                            )
                        })
                        .collect()
                })
                .unwrap_or_default(),
            footer: Footer {
                copyright_name: s(&["footer", "copyrightName"]),
                email: s(&["footer", "email"]),
            },
            scrape: value_at(v, &["scrape"]).and_then(|meta| ScrapeMeta::deserialize(meta).ok()),
        }
    }
}

fn value_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(*key))
}

fn string_at(value: &Value, path: &[&str]) -> String {
    value_at(value, path)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// String elements of the array at `path`; other elements are skipped.
fn strings_at(value: &Value, path: &[&str]) -> Vec<String> {
    value_at(value, path)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(String::from).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_partial_document_deserializes() {
        let raw = r#"{"brand": {"name": "Acme"}, "hero": {"whatsappNumber": "+1555"}}"#;
        let doc: ContentDocument = serde_json::from_str(raw).unwrap();

        assert_eq!(doc.brand.name, "Acme");
        assert_eq!(doc.hero.messaging_number, "+1555");
        assert!(doc.site.title.is_empty());
        assert!(doc.sections.is_empty());
        assert!(doc.scrape.is_none());
    }

    #[test]
    fn test_serializes_with_landing_keys() {
        let mut doc = ContentDocument::default();
        doc.hero.social_url = "https://www.instagram.com/acme/".into();
        doc.brand.accent_color = "#000".into();
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["hero"]["instagramUrl"], "https://www.instagram.com/acme/");
        assert_eq!(value["brand"]["accentColor"], "#000");
        assert!(value["hero"].get("primaryCtaText").is_some());
        assert!(value["media"].get("heroImage").is_some());
        assert!(value.get("scrape").is_none());
    }

    #[test]
    fn test_scrape_meta_timestamp_is_iso_millis() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let meta = ScrapeMeta::new("https://example.com/", at, true);

        assert_eq!(meta.scraped_at, "2024-03-01T12:30:00.000Z");
        assert!(meta.overwrite);
        assert_eq!(meta.note, fallback::SCRAPE_NOTE);
    }

    #[test]
    fn test_lenient_rejects_only_non_json() {
        assert!(ContentDocument::from_json_lenient("{not json").is_none());
        assert_eq!(
            ContentDocument::from_json_lenient(r#"{"site": 5}"#),
            Some(ContentDocument::default())
        );
        assert_eq!(
            ContentDocument::from_json_lenient("[1, 2]"),
            Some(ContentDocument::default())
        );
    }

    #[test]
    fn test_lenient_keeps_fields_next_to_bad_values() {
        let raw = r#"{
            "site": {"title": "My Title", "description": 7},
            "brand": {"name": "My Brand", "accentColor": null},
            "media": {"heroImage": null, "gallery": ["images/a.jpg", 3, null]},
            "sections": [{"title": "A", "items": [1, "one"]}, "junk", {"title": 2}],
            "scrape": {"sourceUrl": 1}
        }"#;
        let doc = ContentDocument::from_json_lenient(raw).unwrap();

        assert_eq!(doc.site.title, "My Title");
        assert_eq!(doc.site.description, "");
        assert_eq!(doc.brand.name, "My Brand");
        assert_eq!(doc.brand.accent_color, "");
        assert_eq!(doc.media.hero_image, "");
        assert_eq!(doc.media.gallery, vec!["images/a.jpg"]);
        assert_eq!(
            doc.sections,
            vec![Section::new("A", vec!["one".into()]), Section::new("", vec![])]
        );
        assert!(doc.scrape.is_none());
    }

    #[test]
    fn test_lenient_reads_every_serialized_key() {
        let mut doc = ContentDocument::default();
        doc.site = Site {
            title: "t".into(),
            description: "d".into(),
            language: "pt".into(),
        };
        doc.brand = Brand {
            name: "n".into(),
            tagline: "tag".into(),
            accent_color: "#111".into(),
        };
        doc.hero = Hero {
            headline: "h".into(),
            subheadline: "s".into(),
            primary_cta_text: "p".into(),
            messaging_number: "+1".into(),
            messaging_text: "m".into(),
            secondary_cta_text: "sc".into(),
            social_url: "https://instagram.com/x".into(),
        };
        doc.media = Media {
            hero_image: "images/img-001.jpg".into(),
            gallery: vec!["images/img-002.jpg".into()],
        };
        doc.sections = vec![Section::new("Menu", vec!["Espresso".into()])];
        doc.footer = Footer {
            copyright_name: "c".into(),
            email: "e@x.io".into(),
        };
        doc.scrape = Some(ScrapeMeta::new(
            "https://x.io/",
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            false,
        ));

        let raw = serde_json::to_string(&doc).unwrap();
        assert_eq!(ContentDocument::from_json_lenient(&raw), Some(doc));
    }

    #[test]
    fn test_section_capped() {
        let items = (1..=8).map(|i| format!("item {}", i)).collect();
        let section = Section::new("Menu", items);
        assert_eq!(section.capped().items.len(), MAX_SECTION_ITEMS);
    }
}
