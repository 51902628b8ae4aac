use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("chromium binary not found; set REGIONAUDIT_CHROMIUM_PATH or install google-chrome")]
    ChromiumNotFound,

    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("browser session error: {0}")]
    Session(String),

    #[error("artifact I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
