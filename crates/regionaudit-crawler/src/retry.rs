//! Fixed-budget retry for flaky navigation.
//!
//! Navigation failures on storefront pages are usually transient (slow CDN,
//! interstitial redirects), so every attempt is treated as retriable up to
//! the budget, with a fixed cooldown between attempts. Callers degrade
//! rather than abort when the budget is exhausted: a partial capture beats
//! no capture.

use std::future::Future;
use std::time::Duration;

use crate::error::CrawlError;

/// Executes `operation` up to `attempts` times, sleeping `cooldown` between
/// failures.
///
/// Returns the first success, or the last error once the budget is
/// exhausted. With `attempts = 3` the operation runs at most 3 times.
///
/// # Errors
///
/// The final attempt's error when every attempt fails.
pub async fn with_attempts<T, F, Fut>(
    attempts: u32,
    cooldown: Duration,
    mut operation: F,
) -> Result<T, CrawlError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CrawlError>>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= attempts {
                    return Err(err);
                }
                tracing::warn!(
                    attempt,
                    attempts,
                    cooldown_secs = cooldown.as_secs(),
                    error = %err,
                    "navigation attempt failed — retrying after cooldown"
                );
                tokio::time::sleep(cooldown).await;
                attempt += 1;
            }
        }
    }
}
