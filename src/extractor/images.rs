use std::collections::HashSet;

use url::Url;

/// `<img>` attributes holding the image source, in priority order.
pub const IMAGE_SOURCE_ATTRS: &[&str] = &["src", "data-src", "data-lazy-src"];

const VECTOR_EXTENSIONS: &[&str] = &[".svg", ".svgz"];

/// Resolve raw image references against `base` and keep the usable ones.
///
/// Order of first appearance is preserved and duplicates (after resolution)
/// are dropped.
pub fn image_candidates<'a, I>(base: &Url, raw: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .filter_map(|r| base.join(r).ok())
        .map(String::from)
        .filter(|u| is_probable_image(u))
        .filter(|u| seen.insert(u.clone()))
        .collect()
}

/// Rejects empty strings, inline `data:` URIs and vector images.
pub fn is_probable_image(url: &str) -> bool {
    let lower = url.trim().to_lowercase();
    if lower.is_empty() || lower.starts_with("data:") {
        return false;
    }

    let path = Url::parse(&lower)
        .map(|u| u.path().to_string())
        .unwrap_or_default();

    !VECTOR_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(ext) || path.ends_with(ext))
}
