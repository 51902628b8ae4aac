//! Capability interface for the browser session.
//!
//! The driver and extractors speak only this trait, never a concrete
//! browser type: one implementation wraps Chromium, tests use a scripted
//! fake. Headless vs visible automation is configuration on the concrete
//! session, not a subtype.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CrawlError;

/// One exclusively-owned browser page for the duration of a run.
///
/// All methods operate on the session's single page/tab. The session is
/// never closed or recreated between regions within one run.
#[async_trait]
pub trait PageSession: Send + Sync {
    /// Navigates the page, bounded by `timeout`.
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), CrawlError>;

    /// Evaluates a script in the page and returns its JSON value.
    /// Non-serializable results come back as `Value::Null`.
    async fn evaluate(&self, script: &str) -> Result<Value, CrawlError>;

    /// Trimmed inner text of every visible element matching `selector`,
    /// in document order.
    async fn visible_texts(&self, selector: &str) -> Result<Vec<String>, CrawlError>;

    /// Waits until any element matching any of `selectors` is visible.
    /// Returns `false` on timeout — absence is informative, not an error.
    async fn wait_for_any_visible(
        &self,
        selectors: &[&str],
        timeout: Duration,
    ) -> Result<bool, CrawlError>;

    /// Scrolls the viewport vertically by `dy` pixels.
    async fn scroll_by(&self, dy: i64) -> Result<(), CrawlError>;

    /// Captures a non-full-page screenshot to `path`.
    async fn screenshot(&self, path: &Path) -> Result<(), CrawlError>;

    /// The page's current URL.
    async fn current_url(&self) -> Result<String, CrawlError>;
}
