use crate::app_config::{AppConfig, Environment, InstagramAppConfig, SignalsMode, ZeroHitPolicy};
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

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can pass a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;
    let oauth_state_secret = require("CREATORFIT_OAUTH_STATE_SECRET")?;

    let env = parse_environment(&or_default("CREATORFIT_ENV", "development"));

    let bind_addr = or_default("CREATORFIT_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("CREATORFIT_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("CREATORFIT_LOG_LEVEL", "info");
    let static_dir = PathBuf::from(or_default("CREATORFIT_STATIC_DIR", "./public"));
    let taxonomy_path = lookup("CREATORFIT_TAXONOMY_PATH")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);

    let signals_mode = parse_signals_mode(&or_default("CREATORFIT_SIGNALS_MODE", "snapshot"))
        .ok_or_else(|| {
            invalid(
                "CREATORFIT_SIGNALS_MODE",
                "expected 'demo' or 'snapshot'".to_string(),
            )
        })?;
    let zero_hit_policy = parse_zero_hit_policy(&or_default("CREATORFIT_ZERO_HIT_POLICY", "general"))
        .ok_or_else(|| {
            invalid(
                "CREATORFIT_ZERO_HIT_POLICY",
                "expected 'general' or 'declared_category'".to_string(),
            )
        })?;

    let non_empty = |key: &str| lookup(key).ok().filter(|v| !v.trim().is_empty());
    let instagram = match (
        non_empty("INSTAGRAM_CLIENT_ID"),
        non_empty("INSTAGRAM_CLIENT_SECRET"),
        non_empty("INSTAGRAM_REDIRECT_URI"),
    ) {
        (Some(client_id), Some(client_secret), Some(redirect_uri)) => Some(InstagramAppConfig {
            client_id,
            client_secret,
            redirect_uri,
        }),
        _ => None,
    };

    let http_timeout_secs = parse_u64("CREATORFIT_HTTP_TIMEOUT_SECS", "15")?;
    let db_max_connections = parse_u32("CREATORFIT_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("CREATORFIT_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("CREATORFIT_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        static_dir,
        taxonomy_path,
        signals_mode,
        zero_hit_policy,
        oauth_state_secret,
        instagram,
        http_timeout_secs,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
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

fn parse_signals_mode(s: &str) -> Option<SignalsMode> {
    match s.trim().to_lowercase().as_str() {
        "demo" => Some(SignalsMode::Demo),
        "snapshot" => Some(SignalsMode::Snapshot),
        _ => None,
    }
}

fn parse_zero_hit_policy(s: &str) -> Option<ZeroHitPolicy> {
    match s.trim().to_lowercase().as_str() {
        "general" => Some(ZeroHitPolicy::General),
        "declared_category" => Some(ZeroHitPolicy::DeclaredCategory),
        _ => None,
    }
}
