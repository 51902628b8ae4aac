pub mod error;
pub mod overrides;
pub mod reconcile;
pub mod report;

pub use error::ReportError;
pub use overrides::{lookup_override, parse_override_blob};
pub use reconcile::{clean_currency, reconcile_run, ReconcileOptions};
pub use report::write_report;
