use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

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
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
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
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let datamall_account_key = require("DATAMALL_ACCOUNT_KEY")?;

    let env = parse_environment(&or_default("PARKFIND_ENV", "development"));
    let log_level = or_default("PARKFIND_LOG_LEVEL", "info");

    let datagov_base_url = or_default("PARKFIND_DATAGOV_BASE_URL", "https://api.data.gov.sg");
    let datamall_base_url = or_default(
        "PARKFIND_DATAMALL_BASE_URL",
        "https://datamall2.mytransport.sg",
    );
    let hdb_information_resource_id = or_default(
        "PARKFIND_HDB_INFORMATION_RESOURCE_ID",
        "139a3035-e624-4f56-b63f-89ae28d4ae4c",
    );
    let rates_resource_id = or_default(
        "PARKFIND_RATES_RESOURCE_ID",
        "85207289-6ae7-4a56-9066-e6090a3684a5",
    );

    let feed_request_timeout_secs = parse_u64("PARKFIND_FEED_REQUEST_TIMEOUT_SECS", "30")?;
    let feed_user_agent = or_default(
        "PARKFIND_FEED_USER_AGENT",
        "parkfind/0.1 (carpark-availability)",
    );
    let feed_max_retries = parse_u32("PARKFIND_FEED_MAX_RETRIES", "3")?;
    let feed_retry_backoff_base_secs = parse_u64("PARKFIND_FEED_RETRY_BACKOFF_BASE_SECS", "5")?;

    let refresh_interval_secs = parse_u64("PARKFIND_REFRESH_INTERVAL_SECS", "90")?;
    let page_size = parse_usize("PARKFIND_PAGE_SIZE", "5")?;
    if page_size == 0 {
        // A zero-size page window has no valid navigation arithmetic.
        return Err(ConfigError::InvalidEnvVar {
            var: "PARKFIND_PAGE_SIZE".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let default_radius_km = parse_f64("PARKFIND_DEFAULT_RADIUS_KM", "3.0")?;

    Ok(AppConfig {
        env,
        log_level,
        datamall_account_key,
        datagov_base_url,
        datamall_base_url,
        hdb_information_resource_id,
        rates_resource_id,
        feed_request_timeout_secs,
        feed_user_agent,
        feed_max_retries,
        feed_retry_backoff_base_secs,
        refresh_interval_secs,
        page_size,
        default_radius_km,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
