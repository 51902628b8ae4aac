//! Chromium-backed [`PageSession`] via chromiumoxide.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use serde_json::Value;

use regionaudit_core::CrawlSettings;

use crate::error::CrawlError;
use crate::selectors;
use crate::session::PageSession;

/// Interval between visibility polls in [`PageSession::wait_for_any_visible`].
const VISIBILITY_POLL_MS: u64 = 250;

/// Locates the Chromium binary: explicit configuration first, then PATH.
#[must_use]
pub fn find_chromium(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = configured {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }
    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }
    None
}

/// A launched Chromium instance with its single audit page.
///
/// The browser session and its one tab are exclusively owned by the run;
/// regions reuse the same page to keep the bot-detection signature of a
/// single browsing session.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
}

impl ChromiumSession {
    /// Launches Chromium and opens the audit page.
    ///
    /// Launch failure is the only fatal error class of the crawl: every
    /// later failure degrades per-region instead.
    ///
    /// # Errors
    ///
    /// - [`CrawlError::ChromiumNotFound`] — no usable binary.
    /// - [`CrawlError::Launch`] — the browser process or first page could
    ///   not be started.
    pub async fn launch(
        settings: &CrawlSettings,
        chromium_path: Option<&Path>,
    ) -> Result<Self, CrawlError> {
        let binary = find_chromium(chromium_path).ok_or(CrawlError::ChromiumNotFound)?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(binary)
            .window_size(1920, 1080)
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage");
        if settings.headed {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|e| CrawlError::Launch(format!("invalid browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| CrawlError::Launch(e.to_string()))?;

        // Drain CDP events so the browser connection never backpressures.
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| CrawlError::Launch(format!("failed to open page: {e}")))?;
        page.set_user_agent(settings.user_agent.as_str())
            .await
            .map_err(|e| CrawlError::Launch(format!("failed to set user agent: {e}")))?;

        Ok(Self { browser, page })
    }

    /// Closes the page and the browser process. Best-effort.
    pub async fn close(mut self) {
        let _ = self.page.close().await;
        let _ = self.browser.close().await;
    }
}

#[async_trait]
impl PageSession for ChromiumSession {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), CrawlError> {
        let goto = tokio::time::timeout(timeout, self.page.goto(url)).await;
        match goto {
            Ok(Ok(_)) => {
                // Settle on DOM-content-loaded; full load is polled later.
                let _ = tokio::time::timeout(timeout, self.page.wait_for_navigation()).await;
                Ok(())
            }
            Ok(Err(e)) => Err(CrawlError::Session(format!("navigation failed: {e}"))),
            Err(_) => Err(CrawlError::Session(format!(
                "navigation timed out after {}s",
                timeout.as_secs()
            ))),
        }
    }

    async fn evaluate(&self, script: &str) -> Result<Value, CrawlError> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| CrawlError::Session(format!("script evaluation failed: {e}")))?;
        // Undefined and other non-JSON results degrade to null.
        Ok(result.into_value().unwrap_or(Value::Null))
    }

    async fn visible_texts(&self, selector: &str) -> Result<Vec<String>, CrawlError> {
        let value = self.evaluate(&selectors::visible_texts_js(selector)).await?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    async fn wait_for_any_visible(
        &self,
        selectors_list: &[&str],
        timeout: Duration,
    ) -> Result<bool, CrawlError> {
        let script = selectors::any_visible_js(selectors_list);
        let started = Instant::now();
        loop {
            if let Ok(value) = self.evaluate(&script).await {
                if value.as_bool() == Some(true) {
                    return Ok(true);
                }
            }
            if started.elapsed() >= timeout {
                return Ok(false);
            }
            tokio::time::sleep(Duration::from_millis(VISIBILITY_POLL_MS)).await;
        }
    }

    async fn scroll_by(&self, dy: i64) -> Result<(), CrawlError> {
        self.evaluate(&selectors::scroll_by_js(dy)).await.map(|_| ())
    }

    async fn screenshot(&self, path: &Path) -> Result<(), CrawlError> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(false)
            .build();
        self.page
            .save_screenshot(params, path)
            .await
            .map_err(|e| CrawlError::Session(format!("screenshot failed: {e}")))?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, CrawlError> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| CrawlError::Session(format!("failed to read URL: {e}")))?;
        Ok(url.map(|u| u.to_string()).unwrap_or_default())
    }
}
