//! Reconciliation: joins persisted artifacts with feed values into
//! per-region comparison rows.
//!
//! The join is total. Every schema artifact in the run directory produces
//! exactly one row; a malformed or missing counterpart degrades that row's
//! field to the `-` placeholder instead of dropping the row. The mismatch
//! flag compares the feed value against the visual observation only; the
//! structured value rides along for diagnosis but never drives the flag.

use std::collections::BTreeMap;
use std::path::Path;

use regionaudit_core::artifacts::{
    region_tag_from_schema_filename, scan_schema_files, scrape_path_for_schema,
};
use regionaudit_core::types::{first_offer, offer_availability, offer_price};
use regionaudit_core::{
    market_from_url, normalize_feed_value, CompareMode, ComparisonRow, TranslationRuleSet,
    VisualSignal,
};
use serde_json::Value;

use crate::overrides::lookup_override;

/// Placeholder for a field whose artifact was missing or malformed.
pub const PLACEHOLDER: &str = "-";

/// Display name for the unparameterized default region.
pub const DEFAULT_REGION_LABEL: &str = "Default (No Param)";

/// Inputs to one reconciliation pass.
#[derive(Debug, Clone)]
pub struct ReconcileOptions<'a> {
    pub mode: CompareMode,
    /// Run-level feed value; used for the default region and as fallback
    /// for regions without an override.
    pub default_feed: &'a str,
    pub overrides: &'a BTreeMap<String, String>,
    pub rules: &'a TranslationRuleSet,
}

/// Strips a price value to digits and separators for comparison.
#[must_use]
pub fn clean_currency(val: &str) -> String {
    val.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect()
}

/// Builds comparison rows for every schema artifact under `schema_dir`,
/// in filename-sorted order.
#[must_use]
pub fn reconcile_run(schema_dir: &Path, opts: &ReconcileOptions<'_>) -> Vec<ComparisonRow> {
    scan_schema_files(schema_dir)
        .iter()
        .filter_map(|schema_path| build_row(schema_path, opts))
        .collect()
}

fn build_row(schema_path: &Path, opts: &ReconcileOptions<'_>) -> Option<ComparisonRow> {
    let name = schema_path.file_name()?.to_str()?;
    let tag = region_tag_from_schema_filename(name)?;
    let region_code = if tag == "default" { "" } else { tag };

    let feed_raw = lookup_override(opts.overrides, region_code).unwrap_or(opts.default_feed);

    let schema_value = read_schema_value(schema_path, opts.mode);
    let signal = read_visual_signal(schema_path);

    let (feed_value, visual_value, visual_value_raw, is_mismatch) = match opts.mode {
        CompareMode::Price => {
            let feed = clean_currency(feed_raw);
            let raw = signal
                .as_ref()
                .map_or_else(|| PLACEHOLDER.to_owned(), |s| s.visual_price.clone());
            let visual = clean_currency(&raw);
            let mismatch = feed != visual;
            (feed, visual, raw, mismatch)
        }
        CompareMode::Availability => {
            let feed = normalize_feed_value(feed_raw);
            let raw = signal
                .as_ref()
                .map_or_else(|| PLACEHOLDER.to_owned(), |s| s.buy_button_text.clone());
            let market = signal
                .as_ref()
                .map_or_else(|| "unknown".to_owned(), |s| market_from_url(&s.source_url));
            let translated = normalize_feed_value(&opts.rules.translate(&raw, &market));
            let mismatch = feed != translated;
            (feed, translated, raw, mismatch)
        }
    };

    Some(ComparisonRow {
        region: if region_code.is_empty() {
            DEFAULT_REGION_LABEL.to_owned()
        } else {
            tag.to_owned()
        },
        feed_value,
        visual_value,
        visual_value_raw,
        schema_value,
        is_mismatch,
    })
}

/// Reads the structured value for one mode out of a schema artifact.
/// Malformed JSON or an absent offer degrades to the placeholder.
fn read_schema_value(schema_path: &Path, mode: CompareMode) -> String {
    let Some(block) = read_json(schema_path) else {
        return PLACEHOLDER.to_owned();
    };
    let Some(offer) = first_offer(&block) else {
        return PLACEHOLDER.to_owned();
    };
    let value = match mode {
        CompareMode::Price => offer_price(offer).map(|p| clean_currency(&p)),
        CompareMode::Availability => offer_availability(offer),
    };
    value.unwrap_or_else(|| PLACEHOLDER.to_owned())
}

/// Reads the paired scrape artifact, if present and well-formed.
fn read_visual_signal(schema_path: &Path) -> Option<VisualSignal> {
    let scrape_path = scrape_path_for_schema(schema_path);
    let raw = read_json(&scrape_path)?;
    serde_json::from_value(raw).ok()
}

fn read_json(path: &Path) -> Option<Value> {
    let raw = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "artifact is not valid JSON — using placeholder");
            None
        }
    }
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
