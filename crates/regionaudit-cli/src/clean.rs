//! Retention sweep over the artifact root.
//!
//! Run directories encode their creation date in the name, so the sweep
//! works from names alone and never touches directory mtimes. Anything
//! outside the `out_<yyyymmdd>_<hhmmss>` scheme is left in place.

use std::path::Path;

use chrono::{Duration, NaiveDate};

use regionaudit_core::artifacts::run_dir_date;

/// Deletes run directories older than `retention_days` relative to `today`.
/// Returns the number of directories removed.
pub fn sweep(outs_dir: &Path, retention_days: i64, today: NaiveDate) -> usize {
    let Ok(entries) = std::fs::read_dir(outs_dir) else {
        tracing::info!(path = %outs_dir.display(), "artifact root does not exist — nothing to clean");
        return 0;
    };
    let threshold = today - Duration::days(retention_days);

    let mut deleted = 0;
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(date) = run_dir_date(name) else {
            continue;
        };
        if date < threshold {
            match std::fs::remove_dir_all(&path) {
                Ok(()) => {
                    tracing::info!(dir = name, %date, "removed expired run directory");
                    deleted += 1;
                }
                Err(e) => {
                    tracing::warn!(dir = name, error = %e, "failed to remove run directory");
                }
            }
        }
    }
    deleted
}
