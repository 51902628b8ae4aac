use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use regionaudit_core::artifacts::run_timestamp;
use regionaudit_core::{
    load_app_config, AppConfig, CompareMode, RegionTable, RunContext, RunPaths,
    TranslationRuleSet,
};
use regionaudit_crawler::{run_audit, ChromiumSession, EventSink};
use regionaudit_report::{parse_override_blob, reconcile_run, ReconcileOptions};

mod blob;
mod clean;

#[derive(Debug, Parser)]
#[command(name = "regionaudit")]
#[command(about = "Region-variant audit of product pages against feed data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl every region variant of a product URL and write the artifact set.
    Audit(AuditArgs),
    /// Reconcile a finished run's artifacts against feed values.
    Summarize(SummarizeArgs),
    /// Delete run directories older than the retention window.
    Clean(CleanArgs),
}

#[derive(Debug, clap::Args)]
struct AuditArgs {
    /// Product URL to audit; may instead be salvaged from --blob.
    #[arg(long)]
    url: Option<String>,
    /// Pasted Merchant Center text to salvage the URL and product id from.
    #[arg(long, default_value = "")]
    blob: String,
    /// Comma-separated region codes, overriding the configured table.
    #[arg(long, default_value = "")]
    regions: String,
    /// Region query parameter name, overriding the configured table.
    #[arg(long, default_value = "")]
    param: String,
    #[arg(long, default_value = "")]
    product_id: String,
    /// Show the browser window instead of running headless.
    #[arg(long)]
    headed: bool,
}

#[derive(Debug, clap::Args)]
struct SummarizeArgs {
    /// Schema directory of a finished run (`outs/out_<ts>/schema`).
    #[arg(long)]
    schema_dir: PathBuf,
    #[arg(long, value_enum)]
    mode: Mode,
    /// Run-level feed value; salvaged from --blob when omitted.
    #[arg(long, default_value = "")]
    default_feed: String,
    /// Pasted per-region override table.
    #[arg(long, default_value = "")]
    overrides: String,
    /// Pasted Merchant Center text to salvage feed defaults from.
    #[arg(long, default_value = "")]
    blob: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Price,
    Availability,
}

impl From<Mode> for CompareMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Price => CompareMode::Price,
            Mode::Availability => CompareMode::Availability,
        }
    }
}

#[derive(Debug, clap::Args)]
struct CleanArgs {
    /// Artifact root; defaults to the configured outs directory.
    #[arg(long)]
    outs_dir: Option<PathBuf>,
    /// Retention window in days; defaults to the configured window.
    #[arg(long)]
    days: Option<i64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = load_app_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&cfg.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Audit(args) => audit(&cfg, args).await,
        Commands::Summarize(args) => summarize(&cfg, &args),
        Commands::Clean(args) => {
            let outs_dir = args.outs_dir.unwrap_or_else(|| cfg.outs_dir.clone());
            let days = args.days.unwrap_or(cfg.retention_days);
            let deleted = clean::sweep(&outs_dir, days, Local::now().date_naive());
            println!("Removed {deleted} expired run directories.");
            Ok(())
        }
    }
}

async fn audit(cfg: &AppConfig, args: AuditArgs) -> anyhow::Result<()> {
    let salvaged = blob::parse_product_blob(&args.blob);
    let base_url = args
        .url
        .or(salvaged.url)
        .context("no product URL: pass --url or a --blob containing one")?;
    let product_id = salvaged.product_id.unwrap_or(args.product_id);

    let mut plan = RegionTable::load(&cfg.regions_path).resolve(&base_url);
    let explicit: Vec<String> = args
        .regions
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_owned)
        .collect();
    if !explicit.is_empty() {
        plan.regions = explicit;
    }
    if !args.param.trim().is_empty() {
        plan.param = args.param.trim().to_owned();
    }

    let run_ts = run_timestamp(Local::now());
    let ctx = RunContext {
        run_ts: run_ts.clone(),
        product_id,
        base_url,
        query_param: plan.param.clone(),
        tasks: plan.tasks(),
        paths: RunPaths::new(&cfg.outs_dir, &run_ts),
        crawl: cfg.crawl_settings(args.headed),
    };

    let session = ChromiumSession::launch(&ctx.crawl, cfg.chromium_path.as_deref())
        .await
        .context("failed to launch browser")?;

    let (sink, mut rx) = EventSink::channel(64);
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            for line in event.to_lines() {
                println!("{line}");
            }
        }
    });

    let result = run_audit(&ctx, &session, &sink).await;
    drop(sink);
    let _ = printer.await;
    session.close().await;

    let summary = result.context("audit run failed")?;
    tracing::info!(
        regions = summary.regions.len(),
        report = %summary.report_path.display(),
        "audit run complete"
    );
    Ok(())
}

fn summarize(cfg: &AppConfig, args: &SummarizeArgs) -> anyhow::Result<()> {
    let rules = TranslationRuleSet::load(&cfg.translations_path);
    let overrides = parse_override_blob(&args.overrides);
    let hints = blob::extract_feed_hints(&args.blob);

    let default_feed = if args.default_feed.is_empty() {
        match args.mode {
            Mode::Price => hints.price,
            Mode::Availability => hints.availability,
        }
    } else {
        args.default_feed.clone()
    };

    let rows = reconcile_run(
        &args.schema_dir,
        &ReconcileOptions {
            mode: args.mode.into(),
            default_feed: &default_feed,
            overrides: &overrides,
            rules: &rules,
        },
    );
    println!("{}", serde_json::to_string(&rows)?);
    Ok(())
}
