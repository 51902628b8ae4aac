//! Visual signal extraction: price text and purchase-button/status text
//! read from the rendered DOM.
//!
//! Both extractions are best-effort chains over fixed candidate lists. Any
//! failure inside one candidate is caught and treated as "not found" for
//! that candidate; the chain continues, and an exhausted chain yields an
//! empty field rather than an error.

use regionaudit_core::{Extraction, VisualSignal};

use crate::selectors::{
    BODY_TEXT_JS, HIGHLIGHT_CTA_SELECTOR, PDP_BUTTON_SELECTOR, PRICE_SELECTORS,
    STATUS_KEYWORDS, STICKY_BUTTON_SELECTOR,
};
use crate::session::PageSession;

/// Strips a price candidate to digits and separators.
#[must_use]
pub fn clean_price_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == ',')
        .to_owned()
}

/// Price-candidate guards: a percent sign marks a discount badge, and a
/// candidate with no digit cannot be a price.
#[must_use]
pub fn accept_price_candidate(raw: &str) -> bool {
    !raw.contains('%') && raw.chars().any(|c| c.is_ascii_digit())
}

/// Title-cases a matched status keyword for display ("out of stock" ->
/// "Out Of Stock").
#[must_use]
pub fn title_case(phrase: &str) -> String {
    phrase
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Walks the ordered price selector chain and returns the first accepted
/// candidate, stripped to digits/separators.
pub async fn extract_visual_price(session: &dyn PageSession) -> Extraction<String> {
    let mut last_failure: Option<String> = None;
    for selector in PRICE_SELECTORS {
        let texts = match session.visible_texts(selector).await {
            Ok(texts) => texts,
            Err(e) => {
                last_failure = Some(format!("selector {selector} failed: {e}"));
                continue;
            }
        };
        for raw in &texts {
            if accept_price_candidate(raw) {
                return Extraction::Found(clean_price_text(raw));
            }
        }
    }
    match last_failure {
        Some(diag) => Extraction::Failed(diag),
        None => Extraction::Missing,
    }
}

/// Extracts the purchase-button or status text.
///
/// Chain, first non-empty wins: sticky action-bar button, primary PDP
/// purchase button, highlighted CTA, then a case-insensitive keyword scan
/// of visible page text (matched keyword reported in title case).
pub async fn extract_button_text(session: &dyn PageSession) -> Extraction<String> {
    for selector in [
        STICKY_BUTTON_SELECTOR,
        PDP_BUTTON_SELECTOR,
        HIGHLIGHT_CTA_SELECTOR,
    ] {
        if let Ok(texts) = session.visible_texts(selector).await {
            if let Some(text) = texts.iter().find(|t| !t.is_empty()) {
                return Extraction::Found(text.clone());
            }
        }
    }

    let body = match session.evaluate(BODY_TEXT_JS).await {
        Ok(value) => value.as_str().unwrap_or_default().to_lowercase(),
        Err(e) => return Extraction::Failed(format!("page text scan failed: {e}")),
    };
    for keyword in STATUS_KEYWORDS {
        if body.contains(keyword) {
            return Extraction::Found(title_case(keyword));
        }
    }
    Extraction::Missing
}

/// Composes the full visual signal for one region. Total: every miss or
/// failure degrades to an empty string.
pub async fn visual_signal(session: &dyn PageSession, source_url: &str) -> VisualSignal {
    let price = extract_visual_price(session).await;
    if let Extraction::Failed(diag) = &price {
        tracing::warn!(%diag, "visual price extraction failed — recording empty price");
    }
    let button = extract_button_text(session).await;
    if let Extraction::Failed(diag) = &button {
        tracing::warn!(%diag, "button text extraction failed — recording empty status");
    }
    VisualSignal {
        visual_price: price.unwrap_or(String::new()),
        buy_button_text: button.unwrap_or(String::new()),
        source_url: source_url.to_owned(),
    }
}

#[cfg(test)]
#[path = "visual_test.rs"]
mod tests;
