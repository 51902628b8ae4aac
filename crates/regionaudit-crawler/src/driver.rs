//! Navigation driver: loads one region variant and captures its screenshot.
//!
//! The visit pipeline is fixed: navigate with a bounded retry budget,
//! remove blocking overlays, simulate minimal scroll interaction, wait for
//! price content, remove overlays again (async content can re-trigger a
//! modal), then capture. Every wait is bounded and every expiry degrades
//! instead of aborting — a partial capture of the region always beats
//! losing it.

use std::path::Path;
use std::time::{Duration, Instant};

use rand::Rng;

use regionaudit_core::CrawlSettings;

use crate::events::EventSink;
use crate::retry;
use crate::selectors::{self, PRICE_WAIT_SELECTORS, READY_STATE_JS};
use crate::session::PageSession;

/// Interval between load-state polls during the quiescence wait.
const QUIESCENCE_POLL_MS: u64 = 250;

/// Result of one region visit. `ok` refers to the screenshot capture; a
/// failed visit still leaves the page loaded as well as possible for
/// extraction.
#[derive(Debug, Clone)]
pub struct VisitOutcome {
    pub ok: bool,
    pub diagnostic: String,
}

impl VisitOutcome {
    fn ok() -> Self {
        Self {
            ok: true,
            diagnostic: "ok".to_owned(),
        }
    }

    fn failed(diagnostic: impl Into<String>) -> Self {
        Self {
            ok: false,
            diagnostic: diagnostic.into(),
        }
    }
}

/// Visits `url` on the shared session and captures a screenshot to
/// `screenshot_path`.
///
/// Never returns an error: navigation exhaustion, wait expiries, and
/// capture problems all degrade into the outcome's `ok`/`diagnostic`.
pub async fn visit(
    session: &dyn PageSession,
    url: &str,
    screenshot_path: &Path,
    settings: &CrawlSettings,
    sink: &EventSink,
    log_prefix: &str,
) -> VisitOutcome {
    sink.progress(format!("{log_prefix} Navigating...")).await;
    let nav = retry::with_attempts(
        settings.nav_attempts,
        Duration::from_secs(settings.nav_cooldown_secs),
        || session.navigate(url, Duration::from_secs(settings.nav_timeout_secs)),
    )
    .await;
    if let Err(e) = &nav {
        // Degraded capture: still try overlays, waits, and the screenshot.
        tracing::warn!(url, error = %e, "navigation budget exhausted — continuing degraded");
    }

    remove_overlays(session).await;

    sink.progress(format!("{log_prefix} Triggering lazy load...")).await;
    simulate_interaction(session, settings).await;

    sink.progress(format!("{log_prefix} Waiting for content...")).await;
    let visible = session
        .wait_for_any_visible(
            PRICE_WAIT_SELECTORS,
            Duration::from_secs(settings.selector_wait_secs),
        )
        .await
        .unwrap_or(false);
    if !visible {
        // Absence is informative, not fatal: sold-out layouts may render
        // no price at all.
        tracing::debug!(url, "no price selector became visible within the wait budget");
    }

    tokio::time::sleep(jitter(Duration::from_millis(800))).await;
    remove_overlays(session).await;

    sink.progress(format!("{log_prefix} Taking screenshot...")).await;
    if let Some(parent) = screenshot_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            return VisitOutcome::failed(format!("cannot create screenshot dir: {e}"));
        }
    }
    if let Err(e) = session.screenshot(screenshot_path).await {
        return VisitOutcome::failed(e.to_string());
    }

    // Guard against blank or placeholder captures.
    match std::fs::metadata(screenshot_path) {
        Ok(meta) if meta.len() >= settings.min_screenshot_bytes => VisitOutcome::ok(),
        Ok(meta) => VisitOutcome::failed(format!(
            "capture below size floor ({} < {} bytes)",
            meta.len(),
            settings.min_screenshot_bytes
        )),
        Err(e) => VisitOutcome::failed(format!("screenshot file missing: {e}")),
    }
}

/// Removes known blocking overlays. Idempotent and swallow-on-error: a
/// failed removal never fails the region.
pub async fn remove_overlays(session: &dyn PageSession) {
    if let Err(e) = session.evaluate(&selectors::overlay_removal_js()).await {
        tracing::debug!(error = %e, "overlay removal script failed — ignoring");
    }
}

/// Scrolls down then back up with short randomized pauses to trigger
/// lazy-loaded content, then waits briefly for the document to settle.
async fn simulate_interaction(session: &dyn PageSession, settings: &CrawlSettings) {
    let _ = session.scroll_by(500).await;
    tokio::time::sleep(jitter(Duration::from_millis(400))).await;
    let _ = session.scroll_by(-500).await;
    tokio::time::sleep(jitter(Duration::from_millis(400))).await;
    wait_for_quiescence(session, Duration::from_secs(settings.quiescence_wait_secs)).await;
}

/// Bounded wait for `document.readyState == "complete"`. Expiry is not an
/// error; the pipeline proceeds with whatever has rendered.
async fn wait_for_quiescence(session: &dyn PageSession, timeout: Duration) {
    let started = Instant::now();
    loop {
        if let Ok(state) = session.evaluate(READY_STATE_JS).await {
            if state.as_str() == Some("complete") {
                return;
            }
        }
        if started.elapsed() >= timeout {
            return;
        }
        tokio::time::sleep(Duration::from_millis(QUIESCENCE_POLL_MS)).await;
    }
}

/// Adds up to 250ms of random jitter to a base delay; uniform timing is a
/// bot-detection signature.
fn jitter(base: Duration) -> Duration {
    base + Duration::from_millis(rand::rng().random_range(0..250))
}
