use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Default desktop user agent presented by the audit browser session.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a set variable carries an unparseable value.
/// Absent variables fall back to defaults — missing configuration never
/// fails a run.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a set variable carries an unparseable value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<i64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let outs_dir = PathBuf::from(or_default("REGIONAUDIT_OUTS_DIR", "./outs"));
    let regions_path = PathBuf::from(or_default(
        "REGIONAUDIT_REGIONS_PATH",
        "./config/regions.json",
    ));
    let translations_path = PathBuf::from(or_default(
        "REGIONAUDIT_TRANSLATIONS_PATH",
        "./config/translations.json",
    ));
    let log_level = or_default("REGIONAUDIT_LOG_LEVEL", "info");
    let chromium_path = lookup("REGIONAUDIT_CHROMIUM_PATH").ok().map(PathBuf::from);
    let user_agent = or_default("REGIONAUDIT_USER_AGENT", DEFAULT_USER_AGENT);

    let nav_timeout_secs = parse_u64("REGIONAUDIT_NAV_TIMEOUT_SECS", "60")?;
    let nav_attempts = parse_u32("REGIONAUDIT_NAV_ATTEMPTS", "3")?;
    let nav_cooldown_secs = parse_u64("REGIONAUDIT_NAV_COOLDOWN_SECS", "2")?;
    let selector_wait_secs = parse_u64("REGIONAUDIT_SELECTOR_WAIT_SECS", "5")?;
    let quiescence_wait_secs = parse_u64("REGIONAUDIT_QUIESCENCE_WAIT_SECS", "3")?;
    let min_screenshot_bytes = parse_u64("REGIONAUDIT_MIN_SCREENSHOT_BYTES", "5000")?;
    let retention_days = parse_i64("REGIONAUDIT_RETENTION_DAYS", "3")?;

    Ok(AppConfig {
        outs_dir,
        regions_path,
        translations_path,
        log_level,
        chromium_path,
        user_agent,
        nav_timeout_secs,
        nav_attempts,
        nav_cooldown_secs,
        selector_wait_secs,
        quiescence_wait_secs,
        min_screenshot_bytes,
        retention_days,
    })
}
