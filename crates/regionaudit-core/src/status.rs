//! Canonical availability categories and the multi-locale status translator.
//!
//! Two layers cooperate here:
//!
//! - [`TranslationRuleSet::translate`] maps raw, locale-specific button or
//!   status text ("Ausverkauft", "Esgotado") to a canonical category using
//!   market-scoped rules first, then global rules, else identity.
//! - [`normalize_feed_value`] canonicalizes free-form feed values
//!   ("In Stock", "out_of_stock") by keyword containment so comparisons run
//!   on categories rather than raw strings. Idempotent.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;

/// The fixed set of normalized availability categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalStatus {
    InStock,
    OutOfStock,
    PreOrder,
}

impl CanonicalStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalStatus::InStock => "InStock",
            CanonicalStatus::OutOfStock => "OutOfStock",
            CanonicalStatus::PreOrder => "PreOrder",
        }
    }
}

impl fmt::Display for CanonicalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonicalizes a feed or status value by keyword containment.
///
/// Rules, checked in order against the lowercased input:
/// - contains `in` and `stock` without `out` -> `InStock`
/// - contains `out` -> `OutOfStock`
/// - contains `pre` -> `PreOrder`
/// - otherwise the input is returned unchanged so the literal text can
///   still surface in comparison rows.
///
/// Applied uniformly to the feed-declared value, regional overrides, and
/// the translated visual value before comparison. Idempotent: canonical
/// outputs map to themselves.
#[must_use]
pub fn normalize_feed_value(text: &str) -> String {
    let lower = text.to_lowercase();
    if lower.contains("in") && lower.contains("stock") && !lower.contains("out") {
        CanonicalStatus::InStock.to_string()
    } else if lower.contains("out") {
        CanonicalStatus::OutOfStock.to_string()
    } else if lower.contains("pre") {
        CanonicalStatus::PreOrder.to_string()
    } else {
        text.to_owned()
    }
}

/// Substring-match translation rules, market-scoped then global.
///
/// Rule keys are lowercased substrings; values are canonical status names.
/// Loaded once per audit run and immutable during the run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslationRuleSet {
    #[serde(default)]
    market_map: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    global_map: BTreeMap<String, String>,
}

impl TranslationRuleSet {
    /// Loads the rule set from a JSON file.
    ///
    /// A missing or unparseable file resolves to an empty rule set, which
    /// makes [`translate`](Self::translate) the identity function rather
    /// than failing the run.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "translation rules not readable — using identity translation");
                return Self::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(rules) => rules,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "translation rules are not valid JSON — using identity translation");
                Self::default()
            }
        }
    }

    /// Translates raw status text into a canonical status name.
    ///
    /// Lookup order: market-scoped rules for `market` (substring match,
    /// case-insensitive, first matching key wins), then global rules under
    /// the same policy, else the original text unchanged — never empty for
    /// non-empty input, so unrecognized phrasings still surface literally.
    #[must_use]
    pub fn translate(&self, raw_text: &str, market: &str) -> String {
        if raw_text.is_empty() {
            return String::new();
        }
        let needle = raw_text.to_lowercase();
        let needle = needle.trim();

        if let Some(rules) = self.market_map.get(market) {
            if let Some(hit) = match_substring(rules, needle) {
                return hit;
            }
        }
        if let Some(hit) = match_substring(&self.global_map, needle) {
            return hit;
        }
        raw_text.to_owned()
    }

    /// `true` when no rules are loaded at all (identity translation).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.market_map.is_empty() && self.global_map.is_empty()
    }
}

/// First rule whose lowercased key is a substring of `needle`.
fn match_substring(rules: &BTreeMap<String, String>, needle: &str) -> Option<String> {
    rules
        .iter()
        .find(|(key, _)| needle.contains(key.to_lowercase().as_str()))
        .map(|(_, value)| value.clone())
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
