use std::collections::BTreeMap;
use std::path::Path;

use regionaudit_core::{CompareMode, TranslationRuleSet};
use serde_json::json;

use super::*;
use crate::overrides::parse_override_blob;

const TS: &str = "20260209_181319";

fn write_schema(dir: &Path, tag: &str, body: &str) {
    std::fs::write(dir.join(format!("region_{tag}__schema_{TS}.json")), body).unwrap();
}

fn write_scrape(dir: &Path, tag: &str, price: &str, button: &str, url: &str) {
    let body = json!({
        "visual_price": price,
        "buy_button_text": button,
        "source_url": url,
    });
    std::fs::write(
        dir.join(format!("region_{tag}__scrape_{TS}.json")),
        body.to_string(),
    )
    .unwrap();
}

fn in_stock_schema() -> String {
    json!({
        "@type": "Product",
        "offers": {"price": "899.00", "availability": "https://schema.org/InStock"}
    })
    .to_string()
}

fn de_rules() -> TranslationRuleSet {
    serde_json::from_value(json!({
        "market_map": {"de": {"ausverkauft": "OutOfStock"}},
        "global_map": {"sold out": "OutOfStock"}
    }))
    .unwrap()
}

fn availability_opts<'a>(
    default_feed: &'a str,
    overrides: &'a BTreeMap<String, String>,
    rules: &'a TranslationRuleSet,
) -> ReconcileOptions<'a> {
    ReconcileOptions {
        mode: CompareMode::Availability,
        default_feed,
        overrides,
        rules,
    }
}

#[test]
fn override_applies_to_its_region_only() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path(), "default", &in_stock_schema());
    write_scrape(dir.path(), "default", "899,00", "In Stock", "https://www.example.com/uk/tv");
    write_schema(dir.path(), "north", &in_stock_schema());
    write_scrape(dir.path(), "north", "", "Out of Stock", "https://www.example.com/uk/tv");

    let overrides = parse_override_blob("north\nOut of Stock\n");
    let rules = TranslationRuleSet::default();
    let rows = reconcile_run(dir.path(), &availability_opts("InStock", &overrides, &rules));

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].region, DEFAULT_REGION_LABEL);
    assert_eq!(rows[0].feed_value, "InStock");
    assert!(!rows[0].is_mismatch);

    assert_eq!(rows[1].region, "north");
    assert_eq!(rows[1].feed_value, "OutOfStock");
    assert_eq!(rows[1].visual_value, "OutOfStock");
    assert!(!rows[1].is_mismatch);
}

#[test]
fn default_region_ignores_overrides_even_for_empty_key() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path(), "default", &in_stock_schema());
    write_scrape(dir.path(), "default", "", "In Stock", "https://www.example.com/uk/tv");

    let mut overrides = BTreeMap::new();
    overrides.insert(String::new(), "OutOfStock".to_owned());
    let rules = TranslationRuleSet::default();
    let rows = reconcile_run(dir.path(), &availability_opts("In Stock", &overrides, &rules));

    assert_eq!(rows[0].feed_value, "InStock");
    assert!(!rows[0].is_mismatch);
}

#[test]
fn feed_visual_disagreement_is_a_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path(), "default", &in_stock_schema());
    write_scrape(dir.path(), "default", "", "Out of Stock", "https://www.example.com/uk/tv");

    let overrides = BTreeMap::new();
    let rules = TranslationRuleSet::default();
    let rows = reconcile_run(dir.path(), &availability_opts("In Stock", &overrides, &rules));

    assert!(rows[0].is_mismatch);
    assert_eq!(rows[0].visual_value, "OutOfStock");
    assert_eq!(rows[0].visual_value_raw, "Out of Stock");
}

#[test]
fn localized_status_translates_through_market_rules() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path(), "default", &in_stock_schema());
    write_scrape(dir.path(), "default", "", "Ausverkauft", "https://www.example.com/de/tv");

    let overrides = BTreeMap::new();
    let rules = de_rules();
    let rows = reconcile_run(dir.path(), &availability_opts("In Stock", &overrides, &rules));

    assert_eq!(rows[0].visual_value, "OutOfStock");
    assert_eq!(rows[0].visual_value_raw, "Ausverkauft");
    assert!(rows[0].is_mismatch);
}

#[test]
fn untranslatable_status_surfaces_literally() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path(), "default", &in_stock_schema());
    write_scrape(dir.path(), "default", "", "Notify Me", "https://www.example.com/de/tv");

    let overrides = BTreeMap::new();
    let rules = de_rules();
    let rows = reconcile_run(dir.path(), &availability_opts("In Stock", &overrides, &rules));

    assert_eq!(rows[0].visual_value, "Notify Me");
    assert!(rows[0].is_mismatch);
}

#[test]
fn structured_value_is_advisory_only() {
    let dir = tempfile::tempdir().unwrap();
    // Structured says OutOfStock, but feed and visual agree.
    let block = json!({
        "@type": "Product",
        "offers": {"availability": "https://schema.org/OutOfStock"}
    });
    write_schema(dir.path(), "default", &block.to_string());
    write_scrape(dir.path(), "default", "", "In Stock", "https://www.example.com/uk/tv");

    let overrides = BTreeMap::new();
    let rules = TranslationRuleSet::default();
    let rows = reconcile_run(dir.path(), &availability_opts("In Stock", &overrides, &rules));

    assert_eq!(rows[0].schema_value, "OutOfStock");
    assert!(!rows[0].is_mismatch);
}

#[test]
fn malformed_schema_artifact_degrades_to_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path(), "default", "{not json");
    write_scrape(dir.path(), "default", "", "In Stock", "https://www.example.com/uk/tv");

    let overrides = BTreeMap::new();
    let rules = TranslationRuleSet::default();
    let rows = reconcile_run(dir.path(), &availability_opts("In Stock", &overrides, &rules));

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].schema_value, PLACEHOLDER);
    assert!(!rows[0].is_mismatch);
}

#[test]
fn missing_scrape_artifact_degrades_to_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path(), "north", &in_stock_schema());

    let overrides = BTreeMap::new();
    let rules = TranslationRuleSet::default();
    let rows = reconcile_run(dir.path(), &availability_opts("In Stock", &overrides, &rules));

    assert_eq!(rows[0].visual_value_raw, PLACEHOLDER);
    assert!(rows[0].is_mismatch);
}

#[test]
fn price_mode_compares_currency_stripped_values() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path(), "default", &in_stock_schema());
    write_scrape(dir.path(), "default", "4.299,00", "Comprar", "https://www.example.com/br/tv");

    let overrides = BTreeMap::new();
    let rules = TranslationRuleSet::default();
    let opts = ReconcileOptions {
        mode: CompareMode::Price,
        default_feed: "R$ 4.299,00",
        overrides: &overrides,
        rules: &rules,
    };
    let rows = reconcile_run(dir.path(), &opts);

    assert_eq!(rows[0].feed_value, "4.299,00");
    assert_eq!(rows[0].visual_value, "4.299,00");
    assert!(!rows[0].is_mismatch);
    assert_eq!(rows[0].schema_value, "899.00");
}

#[test]
fn price_mode_flags_differing_amounts() {
    let dir = tempfile::tempdir().unwrap();
    write_schema(dir.path(), "default", &in_stock_schema());
    write_scrape(dir.path(), "default", "999,00", "Comprar", "https://www.example.com/br/tv");

    let overrides = BTreeMap::new();
    let rules = TranslationRuleSet::default();
    let opts = ReconcileOptions {
        mode: CompareMode::Price,
        default_feed: "R$ 4.299,00",
        overrides: &overrides,
        rules: &rules,
    };
    let rows = reconcile_run(dir.path(), &opts);
    assert!(rows[0].is_mismatch);
}

#[test]
fn rows_follow_filename_sort_order() {
    let dir = tempfile::tempdir().unwrap();
    for tag in ["north", "default", "south"] {
        write_schema(dir.path(), tag, &in_stock_schema());
    }
    let overrides = BTreeMap::new();
    let rules = TranslationRuleSet::default();
    let rows = reconcile_run(dir.path(), &availability_opts("In Stock", &overrides, &rules));

    let regions: Vec<&str> = rows.iter().map(|r| r.region.as_str()).collect();
    assert_eq!(regions, vec![DEFAULT_REGION_LABEL, "north", "south"]);
}

#[test]
fn empty_or_missing_directory_yields_no_rows() {
    let overrides = BTreeMap::new();
    let rules = TranslationRuleSet::default();
    let rows = reconcile_run(
        Path::new("/nonexistent/schema"),
        &availability_opts("In Stock", &overrides, &rules),
    );
    assert!(rows.is_empty());
}

#[test]
fn clean_currency_strips_symbols() {
    assert_eq!(clean_currency("R$ 4.299,00"), "4.299,00");
    assert_eq!(clean_currency("€899.00"), "899.00");
    assert_eq!(clean_currency(""), "");
    assert_eq!(clean_currency("-"), "");
}
