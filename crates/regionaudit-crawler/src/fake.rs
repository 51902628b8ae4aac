//! Scripted in-memory [`PageSession`] for driver and extractor tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::CrawlError;
use crate::selectors::{BODY_TEXT_JS, JSONLD_TEXTS_JS, READY_STATE_JS};
use crate::session::PageSession;

pub struct FakeSession {
    /// Visible texts returned per selector.
    pub texts: Mutex<HashMap<String, Vec<String>>>,
    /// Raw linked-data block texts on the "page".
    pub jsonld: Vec<String>,
    /// Visible body text for the keyword fallback scan.
    pub body_text: String,
    /// Number of leading `navigate` calls that fail.
    pub nav_failures: u32,
    pub nav_calls: AtomicU32,
    pub overlay_removals: AtomicU32,
    /// Bytes written when a screenshot is captured.
    pub screenshot_bytes: usize,
    /// Forces `screenshot` itself to error when set.
    pub screenshot_error: Option<String>,
    /// Result of `wait_for_any_visible`.
    pub selector_visible: bool,
    pub url: String,
}

impl Default for FakeSession {
    fn default() -> Self {
        Self {
            texts: Mutex::new(HashMap::new()),
            jsonld: Vec::new(),
            body_text: String::new(),
            nav_failures: 0,
            nav_calls: AtomicU32::new(0),
            overlay_removals: AtomicU32::new(0),
            screenshot_bytes: 10_000,
            screenshot_error: None,
            selector_visible: true,
            url: "https://www.example.com/de/tv".to_owned(),
        }
    }
}

impl FakeSession {
    pub fn with_texts(self, selector: &str, texts: &[&str]) -> Self {
        self.texts.lock().unwrap().insert(
            selector.to_owned(),
            texts.iter().map(|s| (*s).to_owned()).collect(),
        );
        self
    }
}

#[async_trait]
impl PageSession for FakeSession {
    async fn navigate(&self, _url: &str, _timeout: Duration) -> Result<(), CrawlError> {
        let call = self.nav_calls.fetch_add(1, Ordering::SeqCst);
        if call < self.nav_failures {
            Err(CrawlError::Session("navigation timed out".to_owned()))
        } else {
            Ok(())
        }
    }

    async fn evaluate(&self, script: &str) -> Result<Value, CrawlError> {
        if script == JSONLD_TEXTS_JS {
            return Ok(json!(self.jsonld));
        }
        if script == BODY_TEXT_JS {
            return Ok(json!(self.body_text));
        }
        if script == READY_STATE_JS {
            return Ok(json!("complete"));
        }
        if script.contains("selectors.forEach") {
            self.overlay_removals.fetch_add(1, Ordering::SeqCst);
            return Ok(json!(0));
        }
        Ok(Value::Null)
    }

    async fn visible_texts(&self, selector: &str) -> Result<Vec<String>, CrawlError> {
        Ok(self
            .texts
            .lock()
            .unwrap()
            .get(selector)
            .cloned()
            .unwrap_or_default())
    }

    async fn wait_for_any_visible(
        &self,
        _selectors: &[&str],
        _timeout: Duration,
    ) -> Result<bool, CrawlError> {
        Ok(self.selector_visible)
    }

    async fn scroll_by(&self, _dy: i64) -> Result<(), CrawlError> {
        Ok(())
    }

    async fn screenshot(&self, path: &Path) -> Result<(), CrawlError> {
        if let Some(message) = &self.screenshot_error {
            return Err(CrawlError::Session(message.clone()));
        }
        std::fs::write(path, vec![0u8; self.screenshot_bytes])?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, CrawlError> {
        Ok(self.url.clone())
    }
}
