use crate::app_config::AppConfig;
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
/// The parsing/validation logic is decoupled from the process environment so
/// tests can drive it from a plain `HashMap` — no `set_var`/`remove_var`.
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

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let openai_api_key = require("OPENAI_API_KEY")?;
    let serper_api_key = require("SERPER_API_KEY")?;
    let apify_api_token = require("APIFY_API_TOKEN")?;

    let textgen_base_url = or_default("PVI_TEXTGEN_BASE_URL", "https://api.openai.com");
    let textgen_model = or_default("PVI_TEXTGEN_MODEL", "gpt-4o");
    let serper_base_url = or_default("PVI_SERPER_BASE_URL", "https://google.serper.dev");
    let apify_base_url = or_default("PVI_APIFY_BASE_URL", "https://api.apify.com");
    let apify_actor = or_default("PVI_APIFY_ACTOR", "apify~amazon-search-scraper");

    let request_timeout_secs = parse_u64("PVI_REQUEST_TIMEOUT_SECS", "30")?;
    let signal_timeout_secs = parse_u64("PVI_SIGNAL_TIMEOUT_SECS", "45")?;
    let user_agent = or_default("PVI_USER_AGENT", "pvi/0.1 (market-viability)");
    let log_level = or_default("PVI_LOG_LEVEL", "info");

    Ok(AppConfig {
        openai_api_key,
        serper_api_key,
        apify_api_token,
        textgen_base_url,
        textgen_model,
        serper_base_url,
        apify_base_url,
        apify_actor,
        request_timeout_secs,
        signal_timeout_secs,
        user_agent,
        log_level,
    })
}
