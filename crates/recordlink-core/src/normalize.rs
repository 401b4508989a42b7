/// Lowercases the input and strips every non-alphanumeric character.
///
/// Runs of punctuation, whitespace, and accents are removed outright rather
/// than collapsed to a separator, so `"O'Brien-Smith"` becomes `"obriensmith"`.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}
