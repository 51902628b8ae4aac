use thiserror::Error;

/// Errors raised while writing the HTML report.
///
/// Reconciliation itself is total and never errors: malformed artifacts
/// degrade to placeholder fields.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
