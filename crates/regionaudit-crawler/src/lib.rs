pub mod chromium;
pub mod coordinator;
pub mod driver;
pub mod error;
pub mod events;
pub mod extract;
pub mod retry;
pub mod selectors;
pub mod session;
pub mod visual;

pub use chromium::ChromiumSession;
pub use coordinator::{run_audit, RunSummary};
pub use driver::{visit, VisitOutcome};
pub use error::CrawlError;
pub use events::{AuditEvent, EventSink};
pub use session::PageSession;

#[cfg(test)]
pub(crate) mod fake;
