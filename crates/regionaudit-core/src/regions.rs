//! Region resolution: market detection from a product URL and the
//! market-keyed table of region codes to visit.
//!
//! Resolution is pure and side-effect-free. A market absent from the table
//! resolves to an empty region list and the default parameter name, which
//! the coordinator treats as a single default-only run.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::types::RegionTask;

/// Query parameter name used when the table does not specify one.
pub const DEFAULT_REGION_PARAM: &str = "region_id";

/// Markets that split by sub-locale: a country code followed by a language
/// segment. `ca` keys both languages; the others only their English variant.
const SPLIT_MARKETS: &[(&str, &[&str])] = &[
    ("ca", &["en", "fr"]),
    ("sa", &["en"]),
    ("ae", &["en"]),
    ("hk", &["en"]),
    ("eg", &["en"]),
];

/// One market's entry in the region configuration table.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketEntry {
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default = "default_param")]
    pub param: String,
}

fn default_param() -> String {
    DEFAULT_REGION_PARAM.to_owned()
}

/// Resolved plan for one URL: ordered region codes and the parameter name
/// that selects a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionPlan {
    pub regions: Vec<String>,
    pub param: String,
}

impl RegionPlan {
    /// An empty plan: no configured regions, default parameter name.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            regions: Vec::new(),
            param: default_param(),
        }
    }

    /// Builds the ordered task list for this plan.
    ///
    /// The unparameterized default variant (empty code) is always first,
    /// regardless of table ordering, and codes are deduplicated preserving
    /// first occurrence.
    #[must_use]
    pub fn tasks(&self) -> Vec<RegionTask> {
        let mut codes: Vec<String> = vec![String::new()];
        for code in &self.regions {
            if !code.is_empty() && !codes.contains(code) {
                codes.push(code.clone());
            }
        }
        codes
            .into_iter()
            .map(|code| RegionTask::new(code, self.param.clone()))
            .collect()
    }
}

/// Region configuration table keyed by market code.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RegionTable {
    markets: BTreeMap<String, MarketEntry>,
}

impl RegionTable {
    /// Loads the table from a JSON file.
    ///
    /// A missing or unparseable file resolves to an empty table (every
    /// market then runs default-only) rather than failing the run.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "region table not readable — using empty table");
                return Self::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "region table is not valid JSON — using empty table");
                Self::default()
            }
        }
    }

    /// Resolves the region plan for a product URL by market lookup.
    #[must_use]
    pub fn resolve(&self, url: &str) -> RegionPlan {
        let market = market_from_url(url);
        self.markets
            .get(&market)
            .map_or_else(RegionPlan::empty, |entry| RegionPlan {
                regions: entry.regions.clone(),
                param: entry.param.clone(),
            })
    }
}

/// Detects the market code from a URL's first path segment, lowercased.
///
/// Markets that split by sub-locale combine the first two segments
/// (`/ca/fr/...` -> `ca_fr`, `/hk/en/...` -> `hk_en`). Returns `"unknown"`
/// when the URL has no usable path segment.
#[must_use]
pub fn market_from_url(url: &str) -> String {
    let Ok(parsed) = url::Url::parse(url) else {
        return "unknown".to_owned();
    };
    let segments: Vec<String> = parsed
        .path_segments()
        .map(|s| {
            s.filter(|seg| !seg.is_empty())
                .map(str::to_lowercase)
                .collect()
        })
        .unwrap_or_default();

    let Some(first) = segments.first() else {
        return "unknown".to_owned();
    };

    if let Some(second) = segments.get(1) {
        for (market, locales) in SPLIT_MARKETS {
            if first == market && locales.contains(&second.as_str()) {
                return format!("{first}_{second}");
            }
        }
    }
    first.clone()
}

/// Returns `url` with the query parameter `key` set to `value`, replacing
/// any existing occurrence. An empty value leaves the URL unchanged (the
/// default region variant carries no parameter).
#[must_use]
pub fn set_query_param(url: &str, key: &str, value: &str) -> String {
    if value.trim().is_empty() {
        return url.to_owned();
    }
    let Ok(mut parsed) = url::Url::parse(url) else {
        return url.to_owned();
    };
    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    {
        let mut pairs = parsed.query_pairs_mut();
        pairs.clear();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        pairs.append_pair(key, value);
    }
    parsed.to_string()
}

#[cfg(test)]
#[path = "regions_test.rs"]
mod tests;
