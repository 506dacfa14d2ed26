//! JSON reply shapes returned by the query engine to its transport.

use serde::Serialize;

use crate::engine::HoursFocus;

/// Structured reply for one resolved query or selection.
///
/// Serializes with a top-level `status` field (`success` / `multiple` /
/// `error`) so transports can forward the body verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum QueryReply {
    Success(SuccessReply),
    Multiple {
        message: String,
        options: Vec<String>,
    },
    Error {
        message: String,
    },
}

/// Payload for `status: success`; only the fields relevant to the answered
/// intent are populated (and serialized).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuccessReply {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_hours: Option<String>,
}

impl QueryReply {
    /// Count answer, optionally scoped by the extracted location phrase.
    #[must_use]
    pub fn count(total: usize, location_phrase: Option<String>) -> Self {
        let noun = if total == 1 { "outlet" } else { "outlets" };
        let message = match &location_phrase {
            Some(phrase) => format!("Found {total} {noun} in {phrase}."),
            None => format!("Found {total} matching {noun}."),
        };
        Self::Success(SuccessReply {
            message,
            total: Some(total),
            location: location_phrase,
            ..SuccessReply::default()
        })
    }

    /// List answer carrying both display text and the structured address
    /// list, so callers needing data are not forced to re-parse text.
    #[must_use]
    pub fn list(addresses: Vec<String>) -> Self {
        let message = format!(
            "Found {} outlet(s):\n{}",
            addresses.len(),
            addresses.join("\n")
        );
        Self::Success(SuccessReply {
            message,
            total: Some(addresses.len()),
            outlets: Some(addresses),
            ..SuccessReply::default()
        })
    }

    /// Hours answer for a single resolved outlet.
    #[must_use]
    pub fn hours(
        name: String,
        address: String,
        operating_hours: Option<String>,
        focus: HoursFocus,
    ) -> Self {
        let hours_text = operating_hours
            .clone()
            .unwrap_or_else(|| "no operating hours on record".to_string());
        let verb = match focus {
            HoursFocus::Opening => "opening hours",
            HoursFocus::Closing => "closing hours",
            HoursFocus::Full => "operating hours",
        };
        let message = format!("{name} ({address}) {verb}: {hours_text}");
        Self::Success(SuccessReply {
            message,
            name: Some(name),
            address: Some(address),
            operating_hours,
            ..SuccessReply::default()
        })
    }

    /// Disambiguation prompt listing the candidate addresses in order.
    #[must_use]
    pub fn multiple(options: Vec<String>) -> Self {
        let numbered: Vec<String> = options
            .iter()
            .enumerate()
            .map(|(i, addr)| format!("{}. {addr}", i + 1))
            .collect();
        let message = format!(
            "Multiple outlets match. Reply with a number to choose one:\n{}",
            numbered.join("\n")
        );
        Self::Multiple { message, options }
    }

    /// Error reply with the given user-facing message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_serializes_with_status_tag() {
        let reply = QueryReply::count(2, Some("jalan".to_string()));
        let json = serde_json::to_value(&reply).expect("serialize");
        assert_eq!(json["status"], "success");
        assert_eq!(json["total"], 2);
        assert_eq!(json["location"], "jalan");
        // Unused intent fields stay off the wire.
        assert!(json.get("outlets").is_none());
        assert!(json.get("operating_hours").is_none());
    }

    #[test]
    fn list_carries_structured_addresses_and_newline_text() {
        let reply = QueryReply::list(vec!["1 Jalan Bangsar".into(), "2 Jalan Ampang".into()]);
        let json = serde_json::to_value(&reply).expect("serialize");
        assert_eq!(json["outlets"].as_array().map(Vec::len), Some(2));
        assert!(json["message"]
            .as_str()
            .is_some_and(|m| m.contains("1 Jalan Bangsar\n2 Jalan Ampang")));
    }

    #[test]
    fn multiple_serializes_options_in_order() {
        let reply = QueryReply::multiple(vec!["a".into(), "b".into()]);
        let json = serde_json::to_value(&reply).expect("serialize");
        assert_eq!(json["status"], "multiple");
        assert_eq!(json["options"][0], "a");
        assert_eq!(json["options"][1], "b");
        assert!(json["message"].as_str().is_some_and(|m| m.contains("1. a")));
    }

    #[test]
    fn error_serializes_message_only() {
        let reply = QueryReply::error("no outlets found");
        let json = serde_json::to_value(&reply).expect("serialize");
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "no outlets found");
    }

    #[test]
    fn hours_reply_mentions_focus() {
        let reply = QueryReply::hours(
            "Subway Bangsar".into(),
            "1 Jalan Bangsar".into(),
            Some("8:00 AM - 10:00 PM".into()),
            HoursFocus::Closing,
        );
        let json = serde_json::to_value(&reply).expect("serialize");
        assert!(json["message"]
            .as_str()
            .is_some_and(|m| m.contains("closing hours")));
        assert_eq!(json["operating_hours"], "8:00 AM - 10:00 PM");
    }

    #[test]
    fn count_message_uses_singular_noun_for_one() {
        let QueryReply::Success(body) = QueryReply::count(1, None) else {
            panic!("expected success reply");
        };
        assert!(body.message.contains("1 matching outlet."));
    }
}
