/// A whitespace-normalized string that is never empty.
///
/// Every run of whitespace is collapsed to a single space and both ends are
/// trimmed. A value that is empty afterwards has no `Text` representation,
/// so "absent" and "blank" are the same `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Text(String);

impl Text {
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = normalize_whitespace(raw);
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Returns the first non-empty value of a precedence list.
pub fn first_text<'a, I>(values: I) -> Option<Text>
where
    I: IntoIterator<Item = &'a str>,
{
    values.into_iter().find_map(Text::new)
}

/// Collapse whitespace runs into single spaces and trim both ends.
pub fn normalize_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
