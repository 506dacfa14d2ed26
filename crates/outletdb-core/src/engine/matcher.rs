//! Location matching: which known addresses does a query plausibly refer to?

/// Tokens carrying no location signal; removed before matching.
const STOP_WORDS: [&str; 7] = ["the", "at", "in", "does", "what", "time", "hours"];

/// Strategy for resolving normalized query text against known location labels.
///
/// Kept behind a trait so the permissive substring matcher can be swapped for
/// token-set similarity or an edit-distance matcher without touching the
/// resolver's state machine.
pub trait LocationMatcher: Send + Sync {
    /// Labels that plausibly match the query, in the same order as `labels`.
    fn matching_labels(&self, normalized_query: &str, labels: &[String]) -> Vec<String>;
}

/// Default matcher: a label matches when ANY signal token is a substring of
/// the lowercased label.
///
/// Deliberately permissive: substring rather than whole-word. Short tokens
/// produce false positives, but the disambiguation flow lets the user pick
/// from a shortlist, so recall beats precision here.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl SubstringMatcher {
    /// Query tokens remaining after stop-word removal.
    fn signal_tokens(normalized_query: &str) -> Vec<&str> {
        normalized_query
            .split_whitespace()
            .filter(|token| !STOP_WORDS.contains(token))
            .collect()
    }
}

impl LocationMatcher for SubstringMatcher {
    fn matching_labels(&self, normalized_query: &str, labels: &[String]) -> Vec<String> {
        let signal = Self::signal_tokens(normalized_query);
        if signal.is_empty() {
            return Vec::new();
        }

        labels
            .iter()
            .filter(|label| {
                let lowered = label.to_lowercase();
                signal.iter().any(|token| lowered.contains(token))
            })
            .cloned()
            .collect()
    }
}
