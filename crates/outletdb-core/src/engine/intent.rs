//! Keyword-signal intent classification for normalized query text.

const COUNT_KEYWORDS: [&str; 4] = ["how many", "count", "number", "total"];
const LIST_KEYWORDS: [&str; 5] = [
    "list",
    "show all",
    "which outlets",
    "available outlets",
    "where",
];
const OPENING_KEYWORDS: [&str; 3] = ["open", "opening", "start"];
const CLOSING_KEYWORDS: [&str; 3] = ["close", "closing", "end"];

/// Classified purpose of a query.
///
/// A query may carry several keyword signals at once; priority when building
/// the response is Count > List > Hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryIntent {
    Count,
    List,
    Hours,
    Unclassified,
}

/// Opening/closing sub-intent, only meaningful once a single outlet resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoursFocus {
    Opening,
    Closing,
    Full,
}

/// Outcome of classifying one normalized query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedQuery {
    pub intent: QueryIntent,
    pub focus: HoursFocus,
    /// Text after the last token `in`, kept only for message context.
    /// Matching itself always runs the full token algorithm.
    pub location_phrase: Option<String>,
}

/// Classify a normalized query by keyword presence.
///
/// All keyword checks are plain substring tests against the normalized text,
/// matching the permissive style of the location matcher.
#[must_use]
pub fn classify(normalized_query: &str) -> ClassifiedQuery {
    let has = |keywords: &[&str]| keywords.iter().any(|k| normalized_query.contains(k));

    let focus = if has(&CLOSING_KEYWORDS) {
        HoursFocus::Closing
    } else if has(&OPENING_KEYWORDS) {
        HoursFocus::Opening
    } else {
        HoursFocus::Full
    };

    let intent = if has(&COUNT_KEYWORDS) {
        QueryIntent::Count
    } else if has(&LIST_KEYWORDS) {
        QueryIntent::List
    } else if focus == HoursFocus::Full {
        QueryIntent::Unclassified
    } else {
        QueryIntent::Hours
    };

    ClassifiedQuery {
        intent,
        focus,
        location_phrase: extract_location_phrase(normalized_query),
    }
}

/// Capture everything after the LAST occurrence of the token `in`.
fn extract_location_phrase(normalized_query: &str) -> Option<String> {
    let tokens: Vec<&str> = normalized_query.split_whitespace().collect();
    let last_in = tokens.iter().rposition(|t| *t == "in")?;
    let rest = &tokens[last_in + 1..];
    if rest.is_empty() {
        None
    } else {
        Some(rest.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_keywords_classify_as_count() {
        for query in [
            "how many outlets in jalan",
            "count outlets",
            "total outlets in kl",
        ] {
            assert_eq!(classify(query).intent, QueryIntent::Count, "query: {query}");
        }
    }

    #[test]
    fn list_keywords_classify_as_list() {
        for query in [
            "list outlets in bangsar",
            "show all outlets",
            "which outlets are in ampang",
            "where are the outlets",
        ] {
            assert_eq!(classify(query).intent, QueryIntent::List, "query: {query}");
        }
    }

    #[test]
    fn closing_keyword_yields_hours_intent_with_closing_focus() {
        let classified = classify("what time does the outlet in bangsar close");
        assert_eq!(classified.intent, QueryIntent::Hours);
        assert_eq!(classified.focus, HoursFocus::Closing);
    }

    #[test]
    fn opening_keyword_yields_hours_intent_with_opening_focus() {
        let classified = classify("when does the bangsar outlet open");
        assert_eq!(classified.intent, QueryIntent::Hours);
        assert_eq!(classified.focus, HoursFocus::Opening);
    }

    #[test]
    fn count_takes_priority_over_list_and_hours() {
        let classified = classify("how many outlets are open where i live");
        assert_eq!(classified.intent, QueryIntent::Count);
    }

    #[test]
    fn list_takes_priority_over_hours() {
        let classified = classify("list outlets that are open");
        assert_eq!(classified.intent, QueryIntent::List);
    }

    #[test]
    fn bare_location_query_is_unclassified() {
        let classified = classify("outlet in bangsar");
        assert_eq!(classified.intent, QueryIntent::Unclassified);
        assert_eq!(classified.focus, HoursFocus::Full);
    }

    #[test]
    fn location_phrase_captures_text_after_last_in() {
        let classified = classify("how many outlets in jalan ampang");
        assert_eq!(classified.location_phrase.as_deref(), Some("jalan ampang"));
    }

    #[test]
    fn location_phrase_uses_last_occurrence_of_in() {
        let classified = classify("outlets in kl in bangsar south");
        assert_eq!(classified.location_phrase.as_deref(), Some("bangsar south"));
    }

    #[test]
    fn trailing_in_yields_no_phrase() {
        assert_eq!(classify("outlets in").location_phrase, None);
    }

    #[test]
    fn no_in_token_yields_no_phrase() {
        assert_eq!(classify("count all outlets").location_phrase, None);
        // "in" inside another word is not the token "in".
        assert_eq!(classify("outlets nearby inside mall").location_phrase, None);
    }
}
