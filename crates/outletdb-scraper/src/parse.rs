//! Extraction of outlet records from locator-page HTML.
//!
//! The page renders each outlet as a `fp_listitem` block carrying the
//! coordinates as data attributes, the name in an `<h4>`, and an
//! `infoboxcontent` whose first paragraph is the address while later
//! paragraphs hold operating-hours lines. Blocks hidden with
//! `display: none` are search leftovers and are skipped.

use regex::Regex;

/// One outlet as scraped from the locator page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedOutlet {
    pub name: String,
    pub address: String,
    pub operating_hours: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub waze_link: Option<String>,
}

const LIST_ITEM_MARKER: &str = "class=\"fp_listitem";

/// Parse every visible, non-blank outlet entry out of the page HTML.
///
/// Malformed blocks are skipped with a debug log rather than failing the
/// whole page.
#[must_use]
pub fn parse_outlets(html: &str) -> Vec<ScrapedOutlet> {
    let mut outlets = Vec::new();

    let starts: Vec<usize> = html
        .match_indices(LIST_ITEM_MARKER)
        .map(|(idx, _)| idx)
        .collect();

    for (i, start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(html.len());
        // Back up to the start of the opening tag so attribute extraction
        // sees the whole `<div ...>` head.
        let tag_start = html[..*start].rfind('<').unwrap_or(*start);
        let block = &html[tag_start..end];

        match parse_block(block) {
            Some(outlet) => outlets.push(outlet),
            None => tracing::debug!(block_index = i, "skipping locator block"),
        }
    }

    outlets
}

fn parse_block(block: &str) -> Option<ScrapedOutlet> {
    let head_end = block.find('>').unwrap_or(block.len());
    let head = &block[..head_end];

    // Hidden entries are filtered-out search results, not real outlets.
    if head.contains("display: none") || head.contains("display:none") {
        return None;
    }

    let latitude = attr_value(head, "data-latitude").filter(|v| !v.is_empty());
    let longitude = attr_value(head, "data-longitude").filter(|v| !v.is_empty());

    let name = first_h4_text(block)?;
    let paragraphs = infobox_paragraphs(block);
    let address = paragraphs.first().cloned()?;
    if name.is_empty() || address.is_empty() {
        return None;
    }

    let hours_lines: Vec<String> = paragraphs
        .iter()
        .skip(1)
        .filter(|line| looks_like_hours(line))
        .cloned()
        .collect();
    let operating_hours = if hours_lines.is_empty() {
        None
    } else {
        Some(hours_lines.join("; "))
    };

    Some(ScrapedOutlet {
        name,
        address,
        operating_hours,
        latitude,
        longitude,
        waze_link: waze_link(block),
    })
}

/// Value of an HTML attribute within a tag head, e.g. `data-latitude="3.1"`.
fn attr_value(head: &str, name: &str) -> Option<String> {
    let re = Regex::new(&format!(r#"{name}="([^"]*)""#)).expect("valid regex");
    re.captures(head)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn first_h4_text(block: &str) -> Option<String> {
    let re = Regex::new(r"(?s)<h4[^>]*>(.*?)</h4>").expect("valid regex");
    re.captures(block)
        .and_then(|cap| cap.get(1))
        .map(|m| clean_text(m.as_str()))
}

/// Trimmed, non-empty paragraph texts of the `infoboxcontent` section.
fn infobox_paragraphs(block: &str) -> Vec<String> {
    let Some(section_start) = block.find("infoboxcontent") else {
        return Vec::new();
    };
    let section = &block[section_start..];

    let re = Regex::new(r"(?s)<p[^>]*>(.*?)</p>").expect("valid regex");
    re.captures_iter(section)
        .filter_map(|cap| cap.get(1))
        .map(|m| clean_text(m.as_str()))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Heuristic from the page markup: hours lines carry a time separator,
/// an AM/PM marker, or the literal "Closed".
fn looks_like_hours(text: &str) -> bool {
    text.contains(':') || text.contains("AM") || text.contains("PM") || text.contains("Closed")
}

/// First Waze link in the block's direction buttons, if any.
fn waze_link(block: &str) -> Option<String> {
    let section_start = block.find("directionButton")?;
    let section = &block[section_start..];

    let re = Regex::new(r#"href="([^"]+)""#).expect("valid regex");
    let link = re
        .captures_iter(section)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .find(|href| href.contains("waze.com"));
    link
}

/// Strip nested tags, decode the entities the page actually uses, and
/// collapse surrounding whitespace.
fn clean_text(fragment: &str) -> String {
    let re = Regex::new(r"<[^>]*>").expect("valid regex");
    let without_tags = re.replace_all(fragment, " ");
    let decoded = without_tags
        .replace("&amp;", "&")
        .replace("&nbsp;", " ")
        .replace("&#39;", "'")
        .replace("&quot;", "\"");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
