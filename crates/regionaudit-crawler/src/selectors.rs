//! Fixed selector lists and page scripts for the audited storefront layout.
//!
//! The audit targets a known set of product-detail templates, so selectors
//! are a closed, ordered list rather than a general-purpose heuristic.
//! Price selectors run most-specific first: the sticky header price takes
//! precedence over table/grid prices.

/// Ordered price selectors, most to least specific.
pub const PRICE_SELECTORS: &[&str] = &[
    ".info-sticky .price-top span",
    ".price-top span",
    ".price-box--price .cell-price",
    ".cell-price.cheaperMA",
    ".PD0033 .cell-price.cheaperMA",
    ".price-area .c-price__purchase",
    ".amount",
    ".cell-price",
];

/// Any of these becoming visible means price content has rendered.
pub const PRICE_WAIT_SELECTORS: &[&str] = &[
    ".price-top",
    ".price-box--price",
    ".cell-price",
    ".amount",
    ".c-price__purchase",
];

/// Sticky/fixed action-bar purchase button.
pub const STICKY_BUTTON_SELECTOR: &str =
    ".info-sticky .info-sticky--btn a, .info-sticky .info-sticky--btn button";

/// Primary product-detail purchase button.
pub const PDP_BUTTON_SELECTOR: &str =
    "a.btn-pdp:not(.hidden) span.button-text, button.btn-pdp:not(.hidden) span.button-text";

/// Highlighted call-to-action element.
pub const HIGHLIGHT_CTA_SELECTOR: &str = ".cta-wrap .highlight";

/// Known status phrases scanned as a last resort, across the storefront's
/// supported languages. Matched case-insensitively against visible page
/// text; the matched keyword is reported in title case.
pub const STATUS_KEYWORDS: &[&str] = &[
    "out of stock",
    "sold out",
    "esgotado",
    "unavailable",
    "stock alert",
    "where to buy",
    "comprar",
    "buy now",
    "add to cart",
    "in stock",
    "pre-order",
    "vorbestellung",
];

/// Blocking overlays removed by identity match: consent banners, modal
/// dimmers, stock-alert popups.
pub const OVERLAY_SELECTORS: &[&str] = &[
    "#onetrust-banner-sdk",
    ".c-pop-msg__dimmed",
    ".c-pop-msg",
    "#popEhfPopup",
    "#popNotifyMeSuccess",
    "#popStockAlert",
    ".cookie-banner",
    ".bv_mbox",
    "div[class*=\"dimmed\"]",
    "div[class*=\"backdrop\"]",
];

/// Script that removes all known overlays and restores scrolling.
/// Idempotent; returns the number of removed nodes.
#[must_use]
pub fn overlay_removal_js() -> String {
    let list = serde_json::to_string(OVERLAY_SELECTORS).unwrap_or_else(|_| "[]".to_owned());
    format!(
        "(() => {{
            const selectors = {list};
            let removed = 0;
            selectors.forEach(sel => {{
                document.querySelectorAll(sel).forEach(el => {{ el.remove(); removed += 1; }});
            }});
            document.documentElement.style.overflow = 'auto';
            if (document.body) document.body.style.overflow = 'auto';
            return removed;
        }})()"
    )
}

/// Script returning the trimmed inner text of every visible element
/// matching `selector`, in document order.
#[must_use]
pub fn visible_texts_js(selector: &str) -> String {
    let sel = serde_json::to_string(selector).unwrap_or_else(|_| "\"\"".to_owned());
    format!(
        "(() => {{
            const visible = el => {{
                const st = window.getComputedStyle(el);
                const r = el.getBoundingClientRect();
                return st.display !== 'none' && st.visibility !== 'hidden' && r.width > 0 && r.height > 0;
            }};
            return Array.from(document.querySelectorAll({sel}))
                .filter(visible)
                .map(el => (el.innerText || '').trim());
        }})()"
    )
}

/// Script returning `true` when any element matching any of `selectors` is
/// visible.
#[must_use]
pub fn any_visible_js(selectors: &[&str]) -> String {
    let joined = selectors.join(", ");
    let sel = serde_json::to_string(&joined).unwrap_or_else(|_| "\"\"".to_owned());
    format!(
        "(() => {{
            const visible = el => {{
                const st = window.getComputedStyle(el);
                const r = el.getBoundingClientRect();
                return st.display !== 'none' && st.visibility !== 'hidden' && r.width > 0 && r.height > 0;
            }};
            return Array.from(document.querySelectorAll({sel})).some(visible);
        }})()"
    )
}

/// Script collecting the text of every embedded linked-data block.
pub const JSONLD_TEXTS_JS: &str = "(() => Array.from(\
    document.querySelectorAll('script[type=\"application/ld+json\"]')\
).map(el => el.textContent || ''))()";

/// Script returning the page's visible body text.
pub const BODY_TEXT_JS: &str = "(document.body ? document.body.innerText : '')";

/// Script returning the document load state.
pub const READY_STATE_JS: &str = "document.readyState";

/// Script scrolling the viewport by `dy` pixels; returns `true`.
#[must_use]
pub fn scroll_by_js(dy: i64) -> String {
    format!("(() => {{ window.scrollBy(0, {dy}); return true; }})()")
}
