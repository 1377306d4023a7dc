use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::domain::normalize_whitespace;

/// Host substring identifying a social profile link.
pub const SOCIAL_DOMAIN: &str = "instagram.com";
/// Short host of the messaging service; the number lives in the path.
pub const MESSAGING_SHORT_HOST: &str = "wa.me";
/// Substrings identifying a messaging deep link.
pub const MESSAGING_MARKERS: &[&str] = &[MESSAGING_SHORT_HOST, "whatsapp.com", "whatsapp://"];

static SOCIAL_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s*\(@([^)]+)\)").unwrap());

pub fn is_social_address(address: &str) -> bool {
    address.contains(SOCIAL_DOMAIN)
}

pub fn is_messaging_link(href: &str) -> bool {
    MESSAGING_MARKERS.iter().any(|marker| href.contains(marker))
}

/// Display name and handle parsed from a social profile page title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialIdentity {
    pub name: String,
    pub handle: String,
}

impl SocialIdentity {
    /// Parse titles shaped like `Dome Castle (@dome.castle) • Instagram photos and videos`.
    pub fn from_title(title: &str) -> Option<Self> {
        let title = normalize_whitespace(title);
        let caps = SOCIAL_TITLE_RE.captures(&title)?;
        Some(Self {
            name: normalize_whitespace(&caps[1]),
            handle: normalize_whitespace(&caps[2]),
        })
    }
}

/// Phone number and prefilled text carried by a messaging deep link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagingContact {
    /// `+` followed by digits, or empty.
    pub number: String,
    pub text: String,
}

impl MessagingContact {
    /// Malformed links yield an empty contact.
    pub fn parse(link: &str) -> Self {
        let Ok(url) = Url::parse(link.trim()) else {
            return Self::default();
        };

        let raw_number = if url.host_str() == Some(MESSAGING_SHORT_HOST) {
            url.path().to_string()
        } else {
            query_param(&url, "phone").unwrap_or_default()
        };

        let text = query_param(&url, "text")
            .filter(|t| !t.is_empty())
            .or_else(|| query_param(&url, "message"))
            .unwrap_or_default();

        Self {
            number: international_number(&raw_number),
            text,
        }
    }
}

fn query_param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn international_number(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        String::new()
    } else {
        format!("+{}", digits)
    }
}
