use std::path::PathBuf;

/// Application configuration, loaded from environment variables.
///
/// Every field has a default: absent configuration degrades to a usable
/// single-market setup rather than failing a run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Root directory for per-run artifact directories.
    pub outs_dir: PathBuf,
    /// Region configuration table (JSON), market code -> regions/param.
    pub regions_path: PathBuf,
    /// Translation rule file (JSON), market/global substring maps.
    pub translations_path: PathBuf,
    pub log_level: String,
    /// Explicit Chromium binary; falls back to PATH discovery when unset.
    pub chromium_path: Option<PathBuf>,
    pub user_agent: String,
    pub nav_timeout_secs: u64,
    pub nav_attempts: u32,
    pub nav_cooldown_secs: u64,
    pub selector_wait_secs: u64,
    pub quiescence_wait_secs: u64,
    /// Screenshots smaller than this are treated as failed captures.
    pub min_screenshot_bytes: u64,
    /// Retention window for the `clean` sweep, in days.
    pub retention_days: i64,
}

/// Navigation and capture tunables handed to the crawl pipeline.
///
/// Retry budget, waits, and headless/visible mode are configuration, not
/// forked code paths.
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub nav_timeout_secs: u64,
    pub nav_attempts: u32,
    pub nav_cooldown_secs: u64,
    pub selector_wait_secs: u64,
    pub quiescence_wait_secs: u64,
    pub min_screenshot_bytes: u64,
    pub user_agent: String,
    /// `false` runs headless; `true` shows the browser window.
    pub headed: bool,
}

impl AppConfig {
    /// Builds the crawl tunables for one run. Headed/headless is a per-run
    /// choice from the invocation, not an environment setting.
    #[must_use]
    pub fn crawl_settings(&self, headed: bool) -> CrawlSettings {
        CrawlSettings {
            nav_timeout_secs: self.nav_timeout_secs,
            nav_attempts: self.nav_attempts,
            nav_cooldown_secs: self.nav_cooldown_secs,
            selector_wait_secs: self.selector_wait_secs,
            quiescence_wait_secs: self.quiescence_wait_secs,
            min_screenshot_bytes: self.min_screenshot_bytes,
            user_agent: self.user_agent.clone(),
            headed,
        }
    }
}
