//! Structured-offer extraction from embedded linked-data blocks.
//!
//! Scans every `script[type="application/ld+json"]` block on the loaded
//! page and selects the first whose declared `@type` resolves to "Product"
//! (a string or one element of a type list, case-insensitive) and which
//! carries an `offers` field. First match wins; no merging across blocks.

use serde_json::Value;

use regionaudit_core::Extraction;

use crate::selectors::JSONLD_TEXTS_JS;
use crate::session::PageSession;

/// Extracts the product block from the current page.
///
/// `Missing` when no block matches, `Failed` when the page script itself
/// could not run; both degrade to an empty offer downstream.
pub async fn extract_structured(session: &dyn PageSession) -> Extraction<Value> {
    let texts = match session.evaluate(JSONLD_TEXTS_JS).await {
        Ok(value) => serde_json::from_value::<Vec<String>>(value).unwrap_or_default(),
        Err(e) => return Extraction::Failed(format!("linked-data scan failed: {e}")),
    };
    select_product_block(&texts)
}

/// Selects the first parseable Product-with-offers block from raw
/// linked-data texts. Unparseable blocks are skipped, never fatal.
#[must_use]
pub fn select_product_block(texts: &[String]) -> Extraction<Value> {
    for raw in texts {
        let Ok(block) = serde_json::from_str::<Value>(raw) else {
            continue;
        };
        if declares_product(&block) && block.get("offers").is_some() {
            return Extraction::Found(block);
        }
    }
    Extraction::Missing
}

/// `true` when the block's `@type` is "Product" (case-insensitive), either
/// as a plain string or as one element of a type list.
fn declares_product(block: &Value) -> bool {
    match block.get("@type") {
        Some(Value::String(t)) => t.eq_ignore_ascii_case("product"),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|t| t.eq_ignore_ascii_case("product")),
        _ => false,
    }
}
