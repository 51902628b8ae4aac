//! On-disk artifact layout for one audit run.
//!
//! ```text
//! outs/out_<ts>/
//!   images/region_<code|default>__website_<ts>.png
//!   schema/region_<code|default>__schema_<ts>.json
//!   schema/region_<code|default>__scrape_<ts>.json
//!   report_<ts>.html
//! ```
//!
//! The filename scheme is load-bearing: schema and scrape files pair by
//! replacing the `__schema_` infix with `__scrape_`, and downstream tooling
//! locates artifacts by these exact names. Directories are write-once per
//! run; the timestamp token keeps concurrent runs from colliding.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate};

const SCHEMA_INFIX: &str = "__schema_";
const SCRAPE_INFIX: &str = "__scrape_";

/// Formats the run timestamp token embedded in directory and file names.
#[must_use]
pub fn run_timestamp(now: DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// Artifact directory layout for one run.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub run_ts: String,
    pub root: PathBuf,
    pub images_dir: PathBuf,
    pub schema_dir: PathBuf,
    pub report_path: PathBuf,
}

impl RunPaths {
    #[must_use]
    pub fn new(outs_dir: &Path, run_ts: &str) -> Self {
        let root = outs_dir.join(format!("out_{run_ts}"));
        Self {
            run_ts: run_ts.to_owned(),
            images_dir: root.join("images"),
            schema_dir: root.join("schema"),
            report_path: root.join(format!("report_{run_ts}.html")),
            root,
        }
    }

    /// Creates the run's image and schema directories.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if a directory cannot be created.
    pub fn ensure_dirs(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.images_dir)?;
        std::fs::create_dir_all(&self.schema_dir)?;
        Ok(())
    }

    #[must_use]
    pub fn image_name(&self, region_tag: &str) -> String {
        format!("region_{region_tag}__website_{}.png", self.run_ts)
    }

    #[must_use]
    pub fn schema_name(&self, region_tag: &str) -> String {
        format!("region_{region_tag}{SCHEMA_INFIX}{}.json", self.run_ts)
    }

    #[must_use]
    pub fn scrape_name(&self, region_tag: &str) -> String {
        format!("region_{region_tag}{SCRAPE_INFIX}{}.json", self.run_ts)
    }

    #[must_use]
    pub fn image_path(&self, region_tag: &str) -> PathBuf {
        self.images_dir.join(self.image_name(region_tag))
    }

    #[must_use]
    pub fn schema_path(&self, region_tag: &str) -> PathBuf {
        self.schema_dir.join(self.schema_name(region_tag))
    }

    #[must_use]
    pub fn scrape_path(&self, region_tag: &str) -> PathBuf {
        self.schema_dir.join(self.scrape_name(region_tag))
    }
}

/// Maps a schema artifact path to its paired scrape artifact by replacing
/// the `__schema_` infix in the filename.
#[must_use]
pub fn scrape_path_for_schema(schema_path: &Path) -> PathBuf {
    let Some(name) = schema_path.file_name().and_then(|n| n.to_str()) else {
        return schema_path.to_path_buf();
    };
    let paired = name.replacen(SCHEMA_INFIX, SCRAPE_INFIX, 1);
    schema_path.with_file_name(paired)
}

/// Extracts the region tag from a schema artifact filename.
///
/// `region_north__schema_20260101_120000.json` -> `north`. Returns `None`
/// for names outside the artifact scheme.
#[must_use]
pub fn region_tag_from_schema_filename(name: &str) -> Option<&str> {
    let rest = name.strip_prefix("region_")?;
    let (tag, _) = rest.split_once(SCHEMA_INFIX)?;
    Some(tag)
}

/// Lists a run's schema artifacts in filename-sorted (hence region-sorted)
/// order. A missing or unreadable directory yields an empty list.
#[must_use]
pub fn scan_schema_files(schema_dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(schema_dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| {
                    n.starts_with("region_") && n.contains(SCHEMA_INFIX) && n.ends_with(".json")
                })
        })
        .collect();
    files.sort();
    files
}

/// Parses the date component out of a run directory name (`out_<yyyymmdd>_<hhmmss>`).
///
/// Used by the retention sweep to age out old runs. Returns `None` for
/// directory names outside the scheme.
#[must_use]
pub fn run_dir_date(dir_name: &str) -> Option<NaiveDate> {
    let rest = dir_name.strip_prefix("out_")?;
    let (date_part, _) = rest.split_once('_')?;
    NaiveDate::parse_from_str(date_part, "%Y%m%d").ok()
}
