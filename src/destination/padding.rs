//! Smart padding: keep pasted text from gluing onto its neighbours.

/// Surround `text` with single spaces, skipping a side that already
/// starts or ends with whitespace. Empty text is returned unchanged.
pub fn apply_smart_padding(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let lead = !text.starts_with(char::is_whitespace);
    let trail = !text.ends_with(char::is_whitespace);

    let mut padded = String::with_capacity(text.len() + 2);
    if lead {
        padded.push(' ');
    }
    padded.push_str(text);
    if trail {
        padded.push(' ');
    }
    padded
}
