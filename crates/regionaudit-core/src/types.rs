//! Shared data model for a region-mismatch audit run.
//!
//! ## Observed artifact shapes
//!
//! ### Structured offer (`region_*__schema_*.json`)
//! The schema.org `Product` block is persisted verbatim, or `{}` when no
//! matching block was found. The `offers` field may be a single object or a
//! non-empty array; only the first element carries the price/availability
//! used downstream. `availability` values arrive as full schema.org URLs
//! (`https://schema.org/InStock`) and are stripped to the bare token when
//! read.
//!
//! ### Visual signal (`region_*__scrape_*.json`)
//! Best-effort DOM observations. Fields are always present and default to
//! the empty string, never `null`, so reconciliation joins stay total.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One region variant to visit in a run.
///
/// An empty `region_code` denotes the unparameterized "default" variant
/// (the URL with no region query parameter). Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTask {
    pub region_code: String,
    pub query_param: String,
}

impl RegionTask {
    #[must_use]
    pub fn new(region_code: impl Into<String>, query_param: impl Into<String>) -> Self {
        Self {
            region_code: region_code.into(),
            query_param: query_param.into(),
        }
    }

    /// `true` for the unparameterized default variant.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.region_code.is_empty()
    }

    /// Token used in artifact filenames: the region code, or `default` for
    /// the unparameterized variant.
    #[must_use]
    pub fn artifact_tag(&self) -> &str {
        if self.region_code.is_empty() {
            "default"
        } else {
            &self.region_code
        }
    }
}

/// Structured offer data parsed from the first schema.org `Product` block
/// that carries an `offers` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredOffer {
    /// Offer price as published in the block, if any.
    pub price: Option<String>,
    /// Availability token with any `schema.org/` prefix stripped.
    pub availability: Option<String>,
    /// The matching block, verbatim. `{}` when no block matched.
    pub raw: Value,
}

impl StructuredOffer {
    /// An offer representing "no structured data found": both fields absent,
    /// raw block `{}`.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            price: None,
            availability: None,
            raw: Value::Object(serde_json::Map::new()),
        }
    }

    /// Builds a `StructuredOffer` from a verbatim product block, reading
    /// price and availability from the first offer element.
    #[must_use]
    pub fn from_block(raw: Value) -> Self {
        let (price, availability) = match first_offer(&raw) {
            Some(offer) => (offer_price(offer), offer_availability(offer)),
            None => (None, None),
        };
        Self {
            price,
            availability,
            raw,
        }
    }
}

/// Returns the first offer element of a product block's `offers` field.
///
/// `offers` may be a single object or a non-empty array; only the first
/// element is used. No merging across elements.
#[must_use]
pub fn first_offer(block: &Value) -> Option<&Value> {
    match block.get("offers")? {
        Value::Array(items) => items.first(),
        obj @ Value::Object(_) => Some(obj),
        _ => None,
    }
}

/// Reads an offer's `price` as a string. Numeric prices are stringified.
#[must_use]
pub fn offer_price(offer: &Value) -> Option<String> {
    match offer.get("price")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads an offer's `availability`, stripping any `http(s)://schema.org/`
/// prefix so `"https://schema.org/InStock"` becomes `"InStock"`.
#[must_use]
pub fn offer_availability(offer: &Value) -> Option<String> {
    let raw = offer.get("availability")?.as_str()?;
    let stripped = raw
        .trim_start_matches("https://schema.org/")
        .trim_start_matches("http://schema.org/");
    Some(stripped.to_owned())
}

/// Visual observations read from the rendered DOM for one region.
///
/// Best-effort: fields default to the empty string, never null, so
/// downstream joins stay total.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisualSignal {
    /// Price text stripped to digits and separators, or empty.
    #[serde(default)]
    pub visual_price: String,
    /// Purchase-button or status text, or empty.
    #[serde(default)]
    pub buy_button_text: String,
    /// The region-variant URL the signal was read from.
    #[serde(default)]
    pub source_url: String,
}

/// Artifact locations for one completed region, as published on the event
/// stream (`[RESULT_JSON]`) and consumed by report generation.
///
/// `website_png_rel` and `schema_json_rel` are relative to the run root so
/// the report can link them; `schema_path_abs` lets a consumer read the
/// structured offer without knowing the layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionArtifacts {
    pub region_id: String,
    pub final_url: String,
    pub website_png_rel: String,
    pub schema_path_abs: String,
    pub schema_json_rel: String,
}

/// Which field pair a reconciliation run compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareMode {
    Price,
    Availability,
}

/// One reconciled row per region: feed vs visual vs structured.
///
/// `is_mismatch` compares the canonicalized feed value against the
/// canonicalized visual value only; the structured value is advisory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub region: String,
    pub feed_value: String,
    pub visual_value: String,
    pub visual_value_raw: String,
    pub schema_value: String,
    pub is_mismatch: bool,
}

/// Per-step extraction result.
///
/// Keeps "not found" and "failed unexpectedly" distinguishable for
/// diagnostics while both degrade to an empty value downstream; extraction
/// never aborts a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction<T> {
    Found(T),
    Missing,
    Failed(String),
}

impl<T> Extraction<T> {
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Extraction::Found(_))
    }

    /// Collapses `Missing` and `Failed` into `None`.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Extraction::Found(v) => Some(v),
            Extraction::Missing | Extraction::Failed(_) => None,
        }
    }

    /// Collapses to a value, using `default` for `Missing`/`Failed`.
    #[must_use]
    pub fn unwrap_or(self, default: T) -> T {
        self.into_option().unwrap_or(default)
    }
}

/// Immutable-after-construction context for one audit run.
///
/// Owned by the coordinator and passed by reference to every component;
/// replaces the ambient session dictionary of earlier tooling.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Run timestamp token (`%Y%m%d_%H%M%S`), embedded in every artifact name.
    pub run_ts: String,
    /// Operator-supplied product identifier, possibly empty.
    pub product_id: String,
    /// The audited product URL without any region parameter applied.
    pub base_url: String,
    /// Query parameter name that selects a region on this market.
    pub query_param: String,
    /// Regions to visit, default variant first.
    pub tasks: Vec<RegionTask>,
    /// Artifact directory layout for this run.
    pub paths: crate::artifacts::RunPaths,
    /// Navigation/capture tunables.
    pub crawl: crate::app_config::CrawlSettings,
}
