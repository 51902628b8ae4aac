use super::*;

fn rules(raw: &str) -> TranslationRuleSet {
    serde_json::from_str(raw).unwrap()
}

// ---------------------------------------------------------------------------
// normalize_feed_value
// ---------------------------------------------------------------------------

#[test]
fn normalize_in_stock_variants() {
    assert_eq!(normalize_feed_value("In Stock"), "InStock");
    assert_eq!(normalize_feed_value("in_stock"), "InStock");
    assert_eq!(normalize_feed_value("available in stock"), "InStock");
}

#[test]
fn normalize_out_of_stock_variants() {
    assert_eq!(normalize_feed_value("Out of Stock"), "OutOfStock");
    assert_eq!(normalize_feed_value("out_of_stock"), "OutOfStock");
    assert_eq!(normalize_feed_value("Sold OUT"), "OutOfStock");
}

#[test]
fn normalize_out_wins_over_in_stock() {
    // Contains both "in" and "stock" but also "out" — the out rule applies.
    assert_eq!(normalize_feed_value("item in stock: out"), "OutOfStock");
}

#[test]
fn normalize_preorder() {
    assert_eq!(normalize_feed_value("Pre-Order"), "PreOrder");
    assert_eq!(normalize_feed_value("preorder"), "PreOrder");
}

#[test]
fn normalize_unrecognized_left_unchanged() {
    assert_eq!(normalize_feed_value("Jetzt Kaufen"), "Jetzt Kaufen");
    assert_eq!(normalize_feed_value(""), "");
}

#[test]
fn normalize_is_idempotent() {
    for input in [
        "In Stock",
        "Out of Stock",
        "Pre-Order",
        "Jetzt Kaufen",
        "InStock",
        "OutOfStock",
        "PreOrder",
        "",
    ] {
        let once = normalize_feed_value(input);
        assert_eq!(normalize_feed_value(&once), once, "not idempotent for {input:?}");
    }
}

// ---------------------------------------------------------------------------
// TranslationRuleSet::translate
// ---------------------------------------------------------------------------

#[test]
fn market_rule_matches_by_substring() {
    let rules = rules(r#"{"market_map": {"de": {"ausverkauft": "OutOfStock"}}}"#);
    assert_eq!(rules.translate("Ausverkauft", "de"), "OutOfStock");
    // Embedded in longer button text still matches.
    assert_eq!(rules.translate("Leider Ausverkauft!", "de"), "OutOfStock");
}

#[test]
fn market_rule_takes_precedence_over_global() {
    let rules = rules(
        r#"{
            "market_map": {"br": {"esgotado": "OutOfStock"}},
            "global_map": {"esgotado": "PreOrder"}
        }"#,
    );
    assert_eq!(rules.translate("Esgotado", "br"), "OutOfStock");
    // A different market falls through to the global rule.
    assert_eq!(rules.translate("Esgotado", "pt"), "PreOrder");
}

#[test]
fn global_rule_applies_when_market_has_no_match() {
    let rules = rules(
        r#"{
            "market_map": {"de": {"ausverkauft": "OutOfStock"}},
            "global_map": {"sold out": "OutOfStock"}
        }"#,
    );
    assert_eq!(rules.translate("Sold Out", "de"), "OutOfStock");
}

#[test]
fn no_match_returns_raw_text_unchanged() {
    let rules = rules(r#"{"market_map": {"de": {"ausverkauft": "OutOfStock"}}}"#);
    assert_eq!(rules.translate("Jetzt Kaufen", "de"), "Jetzt Kaufen");
}

#[test]
fn empty_rule_set_is_identity() {
    let rules = TranslationRuleSet::default();
    assert!(rules.is_empty());
    assert_eq!(rules.translate("anything at all", "de"), "anything at all");
    assert_eq!(rules.translate("", "de"), "");
}

#[test]
fn translate_is_case_insensitive() {
    let rules = rules(r#"{"global_map": {"out of stock": "OutOfStock"}}"#);
    assert_eq!(rules.translate("OUT OF STOCK", "xx"), "OutOfStock");
}

#[test]
fn load_missing_file_is_identity() {
    let rules = TranslationRuleSet::load(std::path::Path::new("/nonexistent/translations.json"));
    assert!(rules.is_empty());
}
