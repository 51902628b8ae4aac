//! Run coordinator: drives the region loop over one shared page session.
//!
//! Regions are visited strictly sequentially on a single session, default
//! variant first. A failed region is reported and skipped, never fatal;
//! the only fatal setup error is being unable to create the artifact
//! directories. Artifact files are written before the region's result event
//! is emitted, so a consumer that sees `[RESULT_JSON]` can read the files
//! immediately.

use std::path::PathBuf;

use regionaudit_core::{set_query_param, RegionArtifacts, RunContext, StructuredOffer};

use crate::driver;
use crate::error::CrawlError;
use crate::events::{AuditEvent, EventSink};
use crate::extract;
use crate::session::PageSession;
use crate::visual;

/// Outcome of a completed audit run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Artifact sets in visit order, one per region that produced output.
    pub regions: Vec<RegionArtifacts>,
    pub report_path: PathBuf,
}

/// Runs the full audit: every region in `ctx.tasks`, then the HTML report.
///
/// # Errors
///
/// Only setup failures are fatal: creating the artifact directories or
/// serializing an artifact for persistence. Per-region navigation and
/// extraction failures degrade to warnings and empty observations.
pub async fn run_audit(
    ctx: &RunContext,
    session: &dyn PageSession,
    sink: &EventSink,
) -> Result<RunSummary, CrawlError> {
    ctx.paths.ensure_dirs()?;

    let total = ctx.tasks.len();
    let mut regions: Vec<RegionArtifacts> = Vec::with_capacity(total);

    for (index, task) in ctx.tasks.iter().enumerate() {
        let tag = task.artifact_tag();
        let log_prefix = format!("<{}/{}> [{}]", index + 1, total, tag);
        let url = set_query_param(&ctx.base_url, &task.query_param, &task.region_code);

        let image_path = ctx.paths.image_path(tag);
        let outcome = driver::visit(session, &url, &image_path, &ctx.crawl, sink, &log_prefix).await;
        if !outcome.ok {
            sink.warn(format!("{log_prefix} Screenshot failed: {}", outcome.diagnostic))
                .await;
        }

        sink.progress(format!("{log_prefix} Extracting product data..."))
            .await;
        let offer = match extract::extract_structured(session).await {
            regionaudit_core::Extraction::Found(block) => StructuredOffer::from_block(block),
            regionaudit_core::Extraction::Missing => StructuredOffer::empty(),
            regionaudit_core::Extraction::Failed(diag) => {
                sink.warn(format!("{log_prefix} Structured data failed: {diag}"))
                    .await;
                StructuredOffer::empty()
            }
        };
        let final_url = session.current_url().await.unwrap_or_else(|_| url.clone());
        let signal = visual::visual_signal(session, &final_url).await;

        let schema_path = ctx.paths.schema_path(tag);
        std::fs::write(&schema_path, serde_json::to_string_pretty(&offer.raw)?)?;
        let scrape_path = ctx.paths.scrape_path(tag);
        std::fs::write(&scrape_path, serde_json::to_string_pretty(&signal)?)?;

        let artifacts = RegionArtifacts {
            region_id: tag.to_owned(),
            final_url,
            website_png_rel: format!("images/{}", ctx.paths.image_name(tag)),
            schema_path_abs: schema_path.display().to_string(),
            schema_json_rel: format!("schema/{}", ctx.paths.schema_name(tag)),
        };
        sink.send(AuditEvent::Region(artifacts.clone())).await;
        regions.push(artifacts);
    }

    sink.progress("Generating HTML Report...").await;
    if let Err(e) =
        regionaudit_report::write_report(&ctx.paths, &ctx.product_id, &ctx.base_url, &regions)
    {
        sink.warn(format!("Report generation failed: {e}")).await;
        tracing::warn!(error = %e, "report generation failed — artifacts remain readable");
    }
    sink.send(AuditEvent::ReportPaths {
        report: ctx.paths.report_path.display().to_string(),
        images: ctx.paths.images_dir.display().to_string(),
        schema: ctx.paths.schema_dir.display().to_string(),
    })
    .await;

    Ok(RunSummary {
        regions,
        report_path: ctx.paths.report_path.clone(),
    })
}
