//! Regional-override blob parsing.
//!
//! Operators paste feed status tables straight out of Merchant Center, so
//! the blob arrives with tab separators, timestamp columns, and arbitrary
//! blank lines. Parsing is a single pass with a pending-key state: a line
//! that reads as a status value closes the pending region key; any other
//! line becomes the new pending key. Timestamp-looking lines are dropped
//! before classification.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use regionaudit_core::normalize_feed_value;

/// Tokens that mark a timestamp column regardless of digits.
const TIMESTAMP_TOKENS: &[&str] = &["KST", "GMT", "UTC", "AM", "PM"];

/// Substrings that classify a line as a status value rather than a region
/// key. Lowercased comparison.
const STATUS_KEYWORDS: &[&str] = &[
    "in stock",
    "out of stock",
    "instock",
    "outofstock",
    "limited",
    "preorder",
    "pre-order",
];

fn clock_time_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d{1,2}:\d{2}\b").expect("valid clock regex"))
}

fn year_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(19|20)\d{2}\b").expect("valid year regex"))
}

fn is_timestamp_noise(line: &str) -> bool {
    TIMESTAMP_TOKENS.iter().any(|t| line.contains(t))
        || clock_time_regex().is_match(line)
        || year_regex().is_match(line)
}

fn is_status_value(line: &str) -> bool {
    let lower = line.to_lowercase();
    STATUS_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Parses a pasted override blob into a region-code -> canonical-status map.
///
/// Tabs and carriage returns are treated as line separators. A status line
/// with no pending region key is ignored; a later pair for the same key
/// overwrites the earlier one. Values are canonicalized on the way in.
#[must_use]
pub fn parse_override_blob(blob: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    let normalized = blob.replace('\t', "\n").replace('\r', "\n");

    let mut pending_key: Option<String> = None;
    for line in normalized.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if is_timestamp_noise(line) {
            continue;
        }
        if is_status_value(line) {
            if let Some(key) = pending_key.take() {
                map.insert(key, normalize_feed_value(line));
            }
        } else {
            pending_key = Some(line.to_owned());
        }
    }
    map
}

/// Case-insensitive override lookup.
///
/// An empty region code never resolves to an override: the default region
/// always uses the run-level feed value.
#[must_use]
pub fn lookup_override<'a>(
    overrides: &'a BTreeMap<String, String>,
    region_code: &str,
) -> Option<&'a str> {
    if region_code.is_empty() {
        return None;
    }
    overrides
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(region_code))
        .map(|(_, value)| value.as_str())
}
