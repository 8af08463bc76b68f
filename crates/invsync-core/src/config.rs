use std::path::PathBuf;

use crate::app_config::{
    AppConfig, EbayCredentials, FetchMode, LedgerSource, SheetsLedger, TelegramConfig,
};
use crate::ConfigError;

const DEFAULT_EBAY_ENDPOINT: &str = "https://api.ebay.com/ws/api.dll";
const DEFAULT_SHEET_RANGE: &str = "Sheet1!A:E";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Use it in tests
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Empty values count as unset, so a `.env` line like `EBAY_AUTH_TOKEN=`
/// behaves the same as leaving the variable out.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let get = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
    };

    let require = |var: &str| -> Result<String, ConfigError> {
        get(var).ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        get(var).unwrap_or_else(|| default.to_string())
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

    let parse_flag = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match get(var) {
            None => Ok(default),
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected true/false, got '{raw}'"),
            }),
        }
    };

    let ledger_source = match or_default("INVSYNC_LEDGER_MODE", "csv")
        .to_ascii_lowercase()
        .as_str()
    {
        "csv" | "public_csv" => LedgerSource::parse(&require("INVSYNC_LEDGER_SOURCE")?),
        "sheets_api" | "service_api" => LedgerSource::SheetsApi(SheetsLedger {
            sheet_id: require("INVSYNC_SHEET_ID")?,
            range: or_default("INVSYNC_SHEET_RANGE", DEFAULT_SHEET_RANGE),
            service_account_json: PathBuf::from(require("GOOGLE_SERVICE_ACCOUNT_JSON")?),
        }),
        other => {
            return Err(ConfigError::InvalidEnvVar {
                var: "INVSYNC_LEDGER_MODE".to_string(),
                reason: format!("unknown ledger mode '{other}' (expected csv or sheets_api)"),
            })
        }
    };

    let fetch_mode = or_default("INVSYNC_FETCH_MODE", "http")
        .parse::<FetchMode>()
        .map_err(|reason| ConfigError::InvalidEnvVar {
            var: "INVSYNC_FETCH_MODE".to_string(),
            reason,
        })?;

    let dry_run = parse_flag("INVSYNC_DRY_RUN", false)?;
    let request_timeout_ms = parse_u64("INVSYNC_REQUEST_TIMEOUT_MS", "25000")?;
    let loop_interval_ms = parse_u64("INVSYNC_LOOP_INTERVAL_MS", "600000")?;
    let fetch_max_retries = parse_u32("INVSYNC_FETCH_MAX_RETRIES", "1")?;
    let fetch_backoff_base_ms = parse_u64("INVSYNC_FETCH_BACKOFF_BASE_MS", "1000")?;
    let notify_fetch_failures = parse_flag("INVSYNC_NOTIFY_FETCH_FAILURES", false)?;
    let log_level = or_default("INVSYNC_LOG_LEVEL", "info");

    if request_timeout_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "INVSYNC_REQUEST_TIMEOUT_MS".to_string(),
            reason: "timeout must be greater than zero".to_string(),
        });
    }

    let ebay = match (
        get("EBAY_AUTH_TOKEN"),
        get("EBAY_DEV_ID"),
        get("EBAY_APP_ID"),
        get("EBAY_CERT_ID"),
    ) {
        (Some(auth_token), Some(dev_id), Some(app_id), Some(cert_id)) => Some(EbayCredentials {
            auth_token,
            dev_id,
            app_id,
            cert_id,
        }),
        (None, None, None, None) => None,
        (token, dev, app, cert) => {
            let missing: Vec<&str> = [
                ("EBAY_AUTH_TOKEN", token.is_none()),
                ("EBAY_DEV_ID", dev.is_none()),
                ("EBAY_APP_ID", app.is_none()),
                ("EBAY_CERT_ID", cert.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();
            return Err(ConfigError::Validation(format!(
                "eBay credentials are partially configured; missing {}",
                missing.join(", ")
            )));
        }
    };

    let ebay_endpoint = or_default("EBAY_ENDPOINT", DEFAULT_EBAY_ENDPOINT);
    let ebay_site_id = parse_u32("EBAY_SITE_ID", "0")?;

    let telegram = match (get("TELEGRAM_BOT_TOKEN"), get("TELEGRAM_CHAT_ID")) {
        (Some(bot_token), Some(chat_id)) => Some(TelegramConfig { bot_token, chat_id }),
        (None, None) => None,
        (Some(_), None) => return Err(ConfigError::MissingEnvVar("TELEGRAM_CHAT_ID".to_string())),
        (None, Some(_)) => {
            return Err(ConfigError::MissingEnvVar("TELEGRAM_BOT_TOKEN".to_string()))
        }
    };

    Ok(AppConfig {
        ledger_source,
        fetch_mode,
        dry_run,
        request_timeout_ms,
        loop_interval_ms,
        fetch_max_retries,
        fetch_backoff_base_ms,
        notify_fetch_failures,
        log_level,
        ebay,
        ebay_endpoint,
        ebay_site_id,
        telegram,
    })
}

/// Parse a boolean flag value. Accepts `true/false`, `1/0`, `yes/no`, `on/off`.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
