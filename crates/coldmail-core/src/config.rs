use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_APIFY_BASE_URL: &str = "https://api.apify.com/";
pub const DEFAULT_APIFY_PROFILE_ACTOR: &str = "VhxlqQXRwhW8H5hNV";
pub const DEFAULT_APIFY_COMPANY_ACTOR: &str = "ipHw77V2NMJPy8sbS";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1/";
pub const DEFAULT_OPENAI_MODEL: &str = "o4-mini";
pub const DEFAULT_REASONING_EFFORT: &str = "medium";
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 4000;
pub const DEFAULT_GENERATION_BACKOFF_BASE_MS: u64 = 2000;

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
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    // Unset falls back to `default`; set but blank is an error.
    let setting = |var: &str, default: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(value) if value.trim().is_empty() => {
                Err(invalid(var, "must not be blank".to_string()))
            }
            Ok(value) => Ok(value.trim().to_string()),
            Err(_) => Ok(default.to_string()),
        }
    };

    let parse_u32 = |var: &str, default: u32| -> Result<u32, ConfigError> {
        match lookup(var) {
            Ok(value) => value.trim().parse::<u32>().map_err(|e| invalid(var, e.to_string())),
            Err(_) => Ok(default),
        }
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match lookup(var) {
            Ok(value) => value.trim().parse::<u64>().map_err(|e| invalid(var, e.to_string())),
            Err(_) => Ok(default),
        }
    };

    let apify_token = require("APIFY_TOKEN")?;
    let openai_api_key = require("OPENAI_API_KEY")?;

    let env = parse_environment(&setting("COLDMAIL_ENV", "development")?)?;

    let bind_addr = setting("COLDMAIL_BIND_ADDR", "0.0.0.0:5000")?
        .parse::<SocketAddr>()
        .map_err(|e| invalid("COLDMAIL_BIND_ADDR", e.to_string()))?;
    let log_level = setting("COLDMAIL_LOG_LEVEL", "info")?;

    let apify_base_url = setting("COLDMAIL_APIFY_BASE_URL", DEFAULT_APIFY_BASE_URL)?;
    let apify_profile_actor = setting("COLDMAIL_APIFY_PROFILE_ACTOR", DEFAULT_APIFY_PROFILE_ACTOR)?;
    let apify_company_actor = setting("COLDMAIL_APIFY_COMPANY_ACTOR", DEFAULT_APIFY_COMPANY_ACTOR)?;
    let retrieval_timeout_secs = parse_u64("COLDMAIL_RETRIEVAL_TIMEOUT_SECS", 120)?;

    let openai_base_url = setting("COLDMAIL_OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL)?;
    let openai_model = setting("COLDMAIL_OPENAI_MODEL", DEFAULT_OPENAI_MODEL)?;
    let generation_timeout_secs = parse_u64("COLDMAIL_GENERATION_TIMEOUT_SECS", 180)?;
    let max_output_tokens =
        parse_u32("COLDMAIL_MAX_OUTPUT_TOKENS", DEFAULT_MAX_OUTPUT_TOKENS)?;
    // Set but empty disables the reasoning hint for non-reasoning models.
    let openai_reasoning_effort = match lookup("COLDMAIL_OPENAI_REASONING_EFFORT") {
        Ok(value) => Some(value.trim().to_string()).filter(|v| !v.is_empty()),
        Err(_) => Some(DEFAULT_REASONING_EFFORT.to_string()),
    };
    let generation_max_retries = parse_u32("COLDMAIL_GENERATION_MAX_RETRIES", 0)?;
    let generation_backoff_base_ms = parse_u64(
        "COLDMAIL_GENERATION_BACKOFF_BASE_MS",
        DEFAULT_GENERATION_BACKOFF_BASE_MS,
    )?;

    if retrieval_timeout_secs == 0 {
        return Err(invalid(
            "COLDMAIL_RETRIEVAL_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    if generation_timeout_secs == 0 {
        return Err(invalid(
            "COLDMAIL_GENERATION_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        apify_token,
        apify_base_url,
        apify_profile_actor,
        apify_company_actor,
        retrieval_timeout_secs,
        openai_api_key,
        openai_base_url,
        openai_model,
        openai_reasoning_effort,
        generation_timeout_secs,
        max_output_tokens,
        generation_max_retries,
        generation_backoff_base_ms,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "COLDMAIL_ENV".to_string(),
            reason: format!("expected development, test, or production; got {other:?}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
