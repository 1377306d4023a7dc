//! Field-by-field merge policy.
//!
//! Each row of [`FIELD_RULES`] names one text field of the content document,
//! where its prior value lives, which scraped evidence competes with it, the
//! fallback, and whether the row takes scraped data at all. Rows run in
//! order, so a row may read values resolved by earlier rows.

use crate::domain::content::fallback;
use crate::domain::{ContentDocument, Text};

/// Scraped values competing for document fields, already derived from the
/// candidate record and the source address.
#[derive(Debug, Clone, Default)]
pub struct Evidence {
    pub title: Option<Text>,
    pub description: Option<Text>,
    pub headline: Option<Text>,
    pub subheadline: Option<Text>,
    pub brand_name: Option<Text>,
    pub messaging_number: Option<Text>,
    pub messaging_text: Option<Text>,
    pub social_url: Option<Text>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Scraped evidence competes through [`prefer`].
    Prefer,
    /// User or brand configuration: prior value or fallback, never scraped.
    Configured,
}

#[derive(Debug, Clone, Copy)]
pub enum Fallback {
    Fixed(&'static str),
    /// Use the value the candidate accessor returns.
    Candidate,
}

/// Reads a candidate value from the evidence and the fields resolved so far.
pub type CandidateFn = fn(&Evidence, &ContentDocument) -> Option<Text>;

pub struct FieldRule {
    pub field: &'static str,
    pub existing: fn(&ContentDocument) -> &str,
    pub candidate: CandidateFn,
    pub fallback: Fallback,
    pub policy: Policy,
    pub assign: fn(&mut ContentDocument, String),
}

impl FieldRule {
    /// Resolve this field from the prior document into `out`.
    pub fn apply(
        &self,
        existing: &ContentDocument,
        evidence: &Evidence,
        out: &mut ContentDocument,
        overwrite: bool,
    ) {
        let prior = Text::new((self.existing)(existing));
        let candidate = (self.candidate)(evidence, out);
        let fallback = match self.fallback {
            Fallback::Fixed(value) => value.to_string(),
            Fallback::Candidate => candidate
                .as_ref()
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
        };

        let value = match self.policy {
            Policy::Prefer => prefer(prior, candidate, &fallback, overwrite),
            Policy::Configured => prior.map(Text::into_string).unwrap_or(fallback),
        };
        (self.assign)(out, value);
    }
}

/// With `overwrite` a non-empty candidate wins; otherwise the prior value
/// wins, then the candidate, then the fallback.
pub fn prefer(
    existing: Option<Text>,
    candidate: Option<Text>,
    fallback: &str,
    overwrite: bool,
) -> String {
    let picked = if overwrite {
        candidate.or(existing)
    } else {
        existing.or(candidate)
    };
    picked
        .map(Text::into_string)
        .unwrap_or_else(|| fallback.to_string())
}

fn none(_: &Evidence, _: &ContentDocument) -> Option<Text> {
    None
}

pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        field: "site.title",
        existing: |d| d.site.title.as_str(),
        candidate: |e, _| e.title.clone(),
        fallback: Fallback::Fixed(fallback::SITE_TITLE),
        policy: Policy::Prefer,
        assign: |d, v| d.site.title = v,
    },
    FieldRule {
        field: "site.description",
        existing: |d| d.site.description.as_str(),
        candidate: |e, _| e.description.clone(),
        fallback: Fallback::Fixed(""),
        policy: Policy::Prefer,
        assign: |d, v| d.site.description = v,
    },
    FieldRule {
        field: "site.language",
        existing: |d| d.site.language.as_str(),
        candidate: none,
        fallback: Fallback::Fixed(fallback::LANGUAGE),
        policy: Policy::Configured,
        assign: |d, v| d.site.language = v,
    },
    FieldRule {
        field: "brand.name",
        existing: |d| d.brand.name.as_str(),
        candidate: |e, _| e.brand_name.clone(),
        fallback: Fallback::Fixed(fallback::BRAND_NAME),
        policy: Policy::Prefer,
        assign: |d, v| d.brand.name = v,
    },
    FieldRule {
        field: "brand.tagline",
        existing: |d| d.brand.tagline.as_str(),
        candidate: |e, _| e.description.clone(),
        fallback: Fallback::Fixed(""),
        policy: Policy::Prefer,
        assign: |d, v| d.brand.tagline = v,
    },
    FieldRule {
        field: "brand.accentColor",
        existing: |d| d.brand.accent_color.as_str(),
        candidate: none,
        fallback: Fallback::Fixed(fallback::ACCENT_COLOR),
        policy: Policy::Configured,
        assign: |d, v| d.brand.accent_color = v,
    },
    FieldRule {
        field: "hero.headline",
        existing: |d| d.hero.headline.as_str(),
        candidate: |e, _| e.headline.clone().or_else(|| e.title.clone()),
        fallback: Fallback::Fixed(fallback::HEADLINE),
        policy: Policy::Prefer,
        assign: |d, v| d.hero.headline = v,
    },
    FieldRule {
        field: "hero.subheadline",
        existing: |d| d.hero.subheadline.as_str(),
        candidate: |e, _| e.subheadline.clone().or_else(|| e.description.clone()),
        fallback: Fallback::Fixed(""),
        policy: Policy::Prefer,
        assign: |d, v| d.hero.subheadline = v,
    },
    FieldRule {
        field: "hero.primaryCtaText",
        existing: |d| d.hero.primary_cta_text.as_str(),
        candidate: none,
        fallback: Fallback::Fixed(fallback::PRIMARY_CTA),
        policy: Policy::Configured,
        assign: |d, v| d.hero.primary_cta_text = v,
    },
    FieldRule {
        field: "hero.whatsappNumber",
        existing: |d| d.hero.messaging_number.as_str(),
        candidate: |e, _| e.messaging_number.clone(),
        fallback: Fallback::Fixed(fallback::MESSAGING_NUMBER),
        policy: Policy::Prefer,
        assign: |d, v| d.hero.messaging_number = v,
    },
    FieldRule {
        field: "hero.whatsappMessage",
        existing: |d| d.hero.messaging_text.as_str(),
        candidate: |e, _| e.messaging_text.clone(),
        fallback: Fallback::Fixed(fallback::MESSAGING_TEXT),
        policy: Policy::Prefer,
        assign: |d, v| d.hero.messaging_text = v,
    },
    FieldRule {
        field: "hero.secondaryCtaText",
        existing: |d| d.hero.secondary_cta_text.as_str(),
        candidate: none,
        fallback: Fallback::Fixed(fallback::SECONDARY_CTA),
        policy: Policy::Configured,
        assign: |d, v| d.hero.secondary_cta_text = v,
    },
    FieldRule {
        field: "hero.instagramUrl",
        existing: |d| d.hero.social_url.as_str(),
        candidate: |e, _| e.social_url.clone(),
        fallback: Fallback::Fixed(fallback::SOCIAL_URL),
        policy: Policy::Prefer,
        assign: |d, v| d.hero.social_url = v,
    },
    FieldRule {
        field: "footer.copyrightName",
        existing: |d| d.footer.copyright_name.as_str(),
        candidate: |_, resolved| Text::new(&resolved.brand.name),
        fallback: Fallback::Candidate,
        policy: Policy::Prefer,
        assign: |d, v| d.footer.copyright_name = v,
    },
    FieldRule {
        field: "footer.email",
        existing: |d| d.footer.email.as_str(),
        candidate: none,
        fallback: Fallback::Fixed(fallback::FOOTER_EMAIL),
        policy: Policy::Configured,
        assign: |d, v| d.footer.email = v,
    },
];
