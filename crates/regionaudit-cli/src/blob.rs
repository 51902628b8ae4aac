//! Salvage of product identity and feed values from pasted Merchant
//! Center text.
//!
//! Operators paste whole feed detail panels rather than individual fields,
//! so salvage works on labeled line pairs: a known label line followed by
//! its value on the next line. Anything unrecognized is ignored.

use regionaudit_report::clean_currency;

/// Product identity salvaged from a blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductInfo {
    pub product_id: Option<String>,
    pub url: Option<String>,
}

/// Feed values salvaged from a blob, used as `summarize` defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedHints {
    pub price: String,
    pub availability: String,
}

/// Extracts the product URL and id from pasted feed text.
///
/// The URL comes from the line after a `product page on your website`
/// label, falling back to the first line that starts with `http`. The id
/// comes from the line after a `product id` label. Labels match whole
/// lines, case-insensitively.
#[must_use]
pub fn parse_product_blob(blob: &str) -> ProductInfo {
    let lines: Vec<&str> = blob.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let mut info = ProductInfo::default();

    for (i, line) in lines.iter().enumerate() {
        let lower = line.to_lowercase();
        if lower == "product page on your website" {
            if let Some(candidate) = lines.get(i + 1) {
                if candidate.starts_with("http") {
                    info.url = Some((*candidate).to_owned());
                }
            }
        } else if lower == "product id" {
            if let Some(candidate) = lines.get(i + 1) {
                info.product_id = Some((*candidate).to_owned());
            }
        }
    }

    if info.url.is_none() {
        info.url = lines
            .iter()
            .find(|l| l.starts_with("http"))
            .map(|l| (*l).to_owned());
    }
    info
}

/// Extracts feed price and availability defaults from pasted feed text.
///
/// A `sale price` value beats a plain `price` value; price candidates
/// without a digit are rejected. The price is currency-stripped.
#[must_use]
pub fn extract_feed_hints(blob: &str) -> FeedHints {
    let lines: Vec<&str> = blob.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let mut sale_price = "";
    let mut regular_price = "";
    let mut availability = "";

    for (i, line) in lines.iter().enumerate() {
        let lower = line.to_lowercase();
        let Some(value) = lines.get(i + 1) else {
            continue;
        };
        if lower.contains("sale price") {
            if value.chars().any(|c| c.is_ascii_digit()) {
                sale_price = value;
            }
        } else if lower == "price" {
            if value.chars().any(|c| c.is_ascii_digit()) {
                regular_price = value;
            }
        } else if lower.contains("availability") {
            availability = value;
        }
    }

    let raw_price = if sale_price.is_empty() {
        regular_price
    } else {
        sale_price
    };
    FeedHints {
        price: clean_currency(raw_price),
        availability: availability.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOB: &str = "\
Product id
tv-oled-evo-2026
Product page on your website
https://www.example.com/de/tv
Price
€1.499,00
Sale price
€1.299,00
Availability
In stock
Last updated 2026-02-09 18:13 KST
";

    #[test]
    fn salvages_labeled_url_and_id() {
        let info = parse_product_blob(BLOB);
        assert_eq!(info.product_id.as_deref(), Some("tv-oled-evo-2026"));
        assert_eq!(info.url.as_deref(), Some("https://www.example.com/de/tv"));
    }

    #[test]
    fn falls_back_to_first_http_line() {
        let info = parse_product_blob("some text\nhttps://www.example.com/uk/tv\nmore");
        assert_eq!(info.url.as_deref(), Some("https://www.example.com/uk/tv"));
        assert!(info.product_id.is_none());
    }

    #[test]
    fn labels_match_case_insensitively() {
        let info = parse_product_blob("PRODUCT ID\nabc-123\n");
        assert_eq!(info.product_id.as_deref(), Some("abc-123"));
    }

    #[test]
    fn empty_blob_salvages_nothing() {
        assert_eq!(parse_product_blob(""), ProductInfo::default());
    }

    #[test]
    fn sale_price_beats_regular_price() {
        let hints = extract_feed_hints(BLOB);
        assert_eq!(hints.price, "1.299,00");
        assert_eq!(hints.availability, "In stock");
    }

    #[test]
    fn regular_price_used_when_no_sale_price() {
        let hints = extract_feed_hints("Price\n€1.499,00\n");
        assert_eq!(hints.price, "1.499,00");
    }

    #[test]
    fn digitless_price_values_are_rejected() {
        let hints = extract_feed_hints("Price\nnot available\n");
        assert_eq!(hints.price, "");
    }
}
