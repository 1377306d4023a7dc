//! Turns raw page markup into a [`CandidateRecord`].
//!
//! Every field follows a precedence list evaluated left to right; the first
//! value that is non-empty after whitespace normalization wins. Missing
//! elements produce empty fields, never errors.

pub mod images;
pub mod links;

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::domain::{first_text, normalize_whitespace, CandidateRecord, Section, Text};

pub use images::{image_candidates, is_probable_image};
pub use links::{is_messaging_link, is_social_address, MessagingContact, SocialIdentity};

/// Sections taken from a scraped page.
pub const MAX_SCRAPED_SECTIONS: usize = 3;
/// Items taken from each scraped section.
pub const MAX_SCRAPED_ITEMS: usize = 6;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

selector!(OG_TITLE, r#"meta[property="og:title"]"#);
selector!(OG_SITE_NAME, r#"meta[property="og:site_name"]"#);
selector!(OG_DESCRIPTION, r#"meta[property="og:description"]"#);
selector!(OG_IMAGE, r#"meta[property="og:image"]"#);
selector!(META_DESCRIPTION, r#"meta[name="description"]"#);
selector!(TITLE, "title");
selector!(H1, "h1");
selector!(H2, "h2");
selector!(LIST_ITEM, "li");
selector!(ANCHOR, "a[href]");
selector!(IMG, "img");

/// Raw page signals the precedence lists draw from.
struct PageSignals {
    og_title: String,
    title_tag: String,
    site_name: String,
    og_description: String,
    meta_description: String,
    first_h1: String,
    first_paragraph: String,
}

impl PageSignals {
    fn read(document: &Html) -> Self {
        let h1 = document.select(&H1).next();
        Self {
            og_title: meta_content(document, &OG_TITLE),
            title_tag: document.select(&TITLE).next().map(text_of).unwrap_or_default(),
            site_name: meta_content(document, &OG_SITE_NAME),
            og_description: meta_content(document, &OG_DESCRIPTION),
            meta_description: meta_content(document, &META_DESCRIPTION),
            first_h1: h1.map(text_of).unwrap_or_default(),
            first_paragraph: h1
                .and_then(|h| following_sibling(h, &["p"]))
                .map(text_of)
                .unwrap_or_default(),
        }
    }
}

/// Extract content candidates from `markup`, resolving links against `base`.
pub fn extract(base: &Url, markup: &str) -> CandidateRecord {
    let document = Html::parse_document(markup);
    let signals = PageSignals::read(&document);

    let title = pick([&signals.og_title, &signals.title_tag, &signals.site_name]);
    let description = pick([&signals.og_description, &signals.meta_description]);
    let headline = pick([&signals.first_h1, &signals.og_title, &signals.title_tag]);
    let subheadline = pick([
        &signals.first_paragraph,
        &signals.og_description,
        &signals.meta_description,
    ]);

    let hrefs: Vec<&str> = document
        .select(&ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .collect();

    let social_url = hrefs
        .iter()
        .find(|h| is_social_address(h))
        .map(|h| h.to_string())
        .unwrap_or_default();
    let messaging_link = hrefs
        .iter()
        .find(|h| is_messaging_link(h))
        .map(|h| h.to_string())
        .unwrap_or_default();

    let og_image = meta_content(&document, &OG_IMAGE);
    let img_sources = document.select(&IMG).filter_map(|img| {
        images::IMAGE_SOURCE_ATTRS
            .iter()
            .filter_map(|attr| img.value().attr(attr))
            .find(|v| !v.trim().is_empty())
    });
    let image_urls = image_candidates(base, std::iter::once(og_image.as_str()).chain(img_sources));

    CandidateRecord {
        title,
        description,
        headline,
        subheadline,
        sections: extract_sections(&document),
        social_url,
        messaging_link,
        image_urls,
    }
}

/// Each `<h2>` with text and a following list becomes one section.
fn extract_sections(document: &Html) -> Vec<Section> {
    document
        .select(&H2)
        .filter_map(|heading| {
            let title = Text::new(&text_of(heading))?;
            let list = following_sibling(heading, &["ul", "ol"])?;
            let items: Vec<String> = list
                .select(&LIST_ITEM)
                .filter_map(|li| Text::new(&text_of(li)))
                .map(Text::into_string)
                .take(MAX_SCRAPED_ITEMS)
                .collect();

            (!items.is_empty()).then(|| Section::new(title.into_string(), items))
        })
        .take(MAX_SCRAPED_SECTIONS)
        .collect()
}

fn pick<const N: usize>(values: [&String; N]) -> String {
    first_text(values.into_iter().map(String::as_str))
        .map(Text::into_string)
        .unwrap_or_default()
}

fn meta_content(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .unwrap_or_default()
        .to_string()
}

fn text_of(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Nearest following sibling element with one of the given tag names.
fn following_sibling<'a>(element: ElementRef<'a>, names: &[&str]) -> Option<ElementRef<'a>> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| names.contains(&sibling.value().name()))
}
