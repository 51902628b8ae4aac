//! Per-run HTML report: one block per region with the screenshot and the
//! visual-vs-structured field table.
//!
//! The report reads artifacts back from disk through the schema/scrape
//! filename pairing rather than trusting in-memory state, so it renders
//! identically when regenerated later from the same run directory.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use regionaudit_core::artifacts::scrape_path_for_schema;
use regionaudit_core::types::{first_offer, offer_availability, offer_price};
use regionaudit_core::{RegionArtifacts, RunPaths, VisualSignal};
use serde_json::Value;

use crate::error::ReportError;
use crate::reconcile::PLACEHOLDER;

const STYLE: &str = "\
body { font-family: sans-serif; margin: 20px; }
h1 { margin-bottom: 5px; }
.meta { color: #666; margin-bottom: 20px; }
.block { border: 1px solid #ccc; margin-bottom: 30px; padding: 15px; border-radius: 8px; }
.block h2 { margin-top: 0; background: #eee; padding: 8px; border-radius: 4px; }
.grid { display: flex; gap: 20px; flex-wrap: wrap; }
.screenshot img { max-width: 500px; border: 1px solid #ddd; display: block; }
.data-table { border-collapse: collapse; width: 100%; max-width: 400px; }
.data-table th, .data-table td { border: 1px solid #eee; padding: 8px; text-align: left; }
.data-table th { background: #f9f9f9; }
.link { display: block; margin-bottom: 10px; word-break: break-all; }";

/// Writes the run's HTML report to `paths.report_path` and returns that
/// path.
///
/// # Errors
///
/// Returns [`ReportError::Io`] when the report file cannot be written.
/// Unreadable per-region artifacts degrade to placeholder cells instead.
pub fn write_report(
    paths: &RunPaths,
    product_id: &str,
    base_url: &str,
    regions: &[RegionArtifacts],
) -> Result<PathBuf, ReportError> {
    let html = render_report(product_id, base_url, regions);
    std::fs::write(&paths.report_path, html)?;
    Ok(paths.report_path.clone())
}

/// Renders the report document. Pure over its inputs plus the artifact
/// files the region entries point at.
#[must_use]
pub fn render_report(product_id: &str, base_url: &str, regions: &[RegionArtifacts]) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Region Audit: {pid}</title>\n<style>\n{STYLE}\n</style>\n</head>\n<body>\n\
         <h1>Audit Report: {pid}</h1>\n\
         <div class=\"meta\">Target URL: <a href=\"{url}\">{url}</a></div>\n",
        pid = escape(product_id),
        url = escape(base_url),
    );

    for region in regions {
        let label = if region.region_id.is_empty() || region.region_id == "default" {
            "Default"
        } else {
            &region.region_id
        };
        let (s_price, s_avail) = structured_cells(Path::new(&region.schema_path_abs));
        let (v_price, v_btn) = visual_cells(Path::new(&region.schema_path_abs));

        let _ = write!(
            html,
            "<div class=\"block\">\n<h2>Region: {label}</h2>\n\
             <div class=\"link\"><a href=\"{url}\" target=\"_blank\">{url}</a></div>\n\
             <div class=\"grid\">\n\
             <div class=\"screenshot\"><strong>Screenshot</strong><br>\
             <img src=\"{png}\" alt=\"Screenshot\"></div>\n\
             <div class=\"data\"><strong>Extracted Data</strong>\n\
             <table class=\"data-table\">\n\
             <tr><th>Field</th><th>Visual (Scrape)</th><th>Schema (JSON-LD)</th></tr>\n\
             <tr><td>Price</td><td>{v_price}</td><td>{s_price}</td></tr>\n\
             <tr><td>Avail/Btn</td><td>{v_btn}</td><td>{s_avail}</td></tr>\n\
             </table></div>\n</div>\n</div>\n",
            label = escape(label),
            url = escape(&region.final_url),
            png = escape(&region.website_png_rel),
            v_price = escape(&v_price),
            s_price = escape(&s_price),
            v_btn = escape(&v_btn),
            s_avail = escape(&s_avail),
        );
    }

    html.push_str("</body></html>\n");
    html
}

/// Price and availability cells from the structured artifact, placeholders
/// on any read or shape problem.
fn structured_cells(schema_path: &Path) -> (String, String) {
    let block = std::fs::read_to_string(schema_path)
        .ok()
        .and_then(|raw| serde_json::from_str::<Value>(&raw).ok());
    let Some(block) = block else {
        return (PLACEHOLDER.to_owned(), PLACEHOLDER.to_owned());
    };
    let Some(offer) = first_offer(&block) else {
        return (PLACEHOLDER.to_owned(), PLACEHOLDER.to_owned());
    };
    (
        offer_price(offer).unwrap_or_else(|| PLACEHOLDER.to_owned()),
        offer_availability(offer).unwrap_or_else(|| PLACEHOLDER.to_owned()),
    )
}

/// Price and button cells from the paired scrape artifact.
fn visual_cells(schema_path: &Path) -> (String, String) {
    let scrape_path = scrape_path_for_schema(schema_path);
    let signal = std::fs::read_to_string(scrape_path)
        .ok()
        .and_then(|raw| serde_json::from_str::<VisualSignal>(&raw).ok());
    match signal {
        Some(signal) => (
            cell(&signal.visual_price),
            cell(&signal.buy_button_text),
        ),
        None => (PLACEHOLDER.to_owned(), PLACEHOLDER.to_owned()),
    }
}

fn cell(value: &str) -> String {
    if value.is_empty() {
        PLACEHOLDER.to_owned()
    } else {
        value.to_owned()
    }
}

/// Minimal HTML entity escaping for interpolated text and attributes.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
