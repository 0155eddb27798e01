use std::net::SocketAddr;
use std::str::FromStr;

use crate::app_config::{AppConfig, Environment, EslSettings, PipelineSettings, PricingMode};
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
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load only the sheet/batching settings from the process environment.
///
/// Used by tools that never talk to the ESL API, so the connection variables
/// are not required.
///
/// # Errors
///
/// Returns `ConfigError` if an optional pipeline variable is set to an
/// invalid value.
pub fn load_pipeline_settings_from_env() -> Result<PipelineSettings, ConfigError> {
    build_pipeline_settings(&|key: &str| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let base_url = require("ESL_API_BASE")?.trim_end_matches('/').to_string();
    let username = require("ESL_USERNAME")?;
    let password = require("ESL_PASSWORD")?;
    let customer_code = require("ESL_CUSTOMER_CODE")?;
    let store_code = require("ESL_STORE_CODE")?;

    let request_timeout_secs: u64 = parse_var(&lookup, "ESL_REQUEST_TIMEOUT_SECS", "30")?;
    let accept_invalid_certs = parse_bool(&or_default(&lookup, "ESL_ACCEPT_INVALID_CERTS", "false"))
        .ok_or_else(|| invalid("ESL_ACCEPT_INVALID_CERTS", "expected true or false".into()))?;

    let pipeline = build_pipeline_settings(&lookup)?;

    let env = parse_environment(&or_default(&lookup, "ESLSYNC_ENV", "development"))?;
    let bind_addr: SocketAddr = parse_var(&lookup, "ESLSYNC_BIND_ADDR", "0.0.0.0:5000")?;
    let log_level = or_default(&lookup, "ESLSYNC_LOG_LEVEL", "info");
    let max_upload_bytes: usize = parse_var(&lookup, "ESLSYNC_MAX_UPLOAD_BYTES", "20971520")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        max_upload_bytes,
        esl: EslSettings {
            base_url,
            username,
            password,
            customer_code,
            store_code,
            request_timeout_secs,
            accept_invalid_certs,
        },
        pipeline,
    })
}

fn build_pipeline_settings<F>(lookup: &F) -> Result<PipelineSettings, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let batch_prefix = or_default(lookup, "ESL_BATCH_PREFIX", "batch-a1");
    let batch_size: usize = parse_var(lookup, "ESL_BATCH_SIZE", "1000")?;
    if batch_size == 0 || batch_size > PipelineSettings::MAX_BATCH_SIZE {
        return Err(invalid(
            "ESL_BATCH_SIZE",
            format!(
                "must be between 1 and {}, got {batch_size}",
                PipelineSettings::MAX_BATCH_SIZE
            ),
        ));
    }
    let pricing_mode = or_default(lookup, "ESL_PRICING_MODE", "auto")
        .parse::<PricingMode>()
        .map_err(|reason| invalid("ESL_PRICING_MODE", reason))?;
    let sheet_skip_rows: usize = parse_var(lookup, "ESL_SHEET_SKIP_ROWS", "1")?;

    Ok(PipelineSettings {
        batch_prefix,
        batch_size,
        pricing_mode,
        sheet_skip_rows,
    })
}

fn or_default<F>(lookup: &F, var: &str, default: &str) -> String
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    lookup(var).unwrap_or_else(|_| default.to_string())
}

fn parse_var<F, T>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    or_default(lookup, var, default)
        .trim()
        .parse::<T>()
        .map_err(|e| invalid(var, e.to_string()))
}

fn invalid(var: &str, reason: String) -> ConfigError {
    ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    }
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than the three
/// known environment names.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ESLSYNC_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
