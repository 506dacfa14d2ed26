//! Query text normalization.

/// Normalize free text for matching: lowercase, drop everything outside
/// `[a-z0-9\s]`, collapse whitespace runs to single spaces, and trim.
///
/// Total and idempotent; empty input yields an empty string.
#[must_use]
pub fn normalize_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut space_pending = false;

    for ch in input.chars() {
        for lowered in ch.to_lowercase() {
            if lowered.is_ascii_alphanumeric() {
                if space_pending && !out.is_empty() {
                    out.push(' ');
                }
                space_pending = false;
                out.push(lowered);
            } else if lowered.is_whitespace() {
                space_pending = true;
            }
            // Anything else (punctuation, non-ASCII letters) is dropped.
        }
    }

    out
}
