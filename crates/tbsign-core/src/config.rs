use std::path::PathBuf;

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

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a pure
/// `HashMap` lookup, no `set_var`/`remove_var` needed.
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

    let cookie = require("TBSIGN_COOKIE")?;
    let username = require("TBSIGN_USER")?;

    let web_base_url = or_default("TBSIGN_WEB_BASE_URL", "https://tieba.baidu.com");
    let api_base_url = or_default("TBSIGN_API_BASE_URL", "http://c.tieba.baidu.com");
    let data_dir = PathBuf::from(or_default("TBSIGN_DATA_DIR", "./.tbsign"));
    let request_timeout_secs = parse_u64("TBSIGN_REQUEST_TIMEOUT_SECS", "30")?;
    let log_level = or_default("TBSIGN_LOG_LEVEL", "info");

    Ok(AppConfig {
        cookie,
        username,
        web_base_url,
        api_base_url,
        data_dir,
        request_timeout_secs,
        log_level,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map with all required env vars populated.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("TBSIGN_COOKIE", "BDUSS=abc");
        m.insert("TBSIGN_USER", "alice");
        m
    }

    #[test]
    fn fails_without_cookie() {
        let mut map = full_env();
        map.remove("TBSIGN_COOKIE");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "TBSIGN_COOKIE"),
            "expected MissingEnvVar(TBSIGN_COOKIE), got: {result:?}"
        );
    }

    #[test]
    fn fails_without_user() {
        let mut map = full_env();
        map.remove("TBSIGN_USER");
        let result = build_app_config(lookup_from_map(&map));
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "TBSIGN_USER"));
    }

    #[test]
    fn applies_defaults() {
        let config = build_app_config(lookup_from_map(&full_env())).expect("valid config");
        assert_eq!(config.web_base_url, "https://tieba.baidu.com");
        assert_eq!(config.api_base_url, "http://c.tieba.baidu.com");
        assert_eq!(config.data_dir, PathBuf::from("./.tbsign"));
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn overrides_win_over_defaults() {
        let mut map = full_env();
        map.insert("TBSIGN_WEB_BASE_URL", "http://127.0.0.1:8080");
        map.insert("TBSIGN_REQUEST_TIMEOUT_SECS", "5");
        let config = build_app_config(lookup_from_map(&map)).expect("valid config");
        assert_eq!(config.web_base_url, "http://127.0.0.1:8080");
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let mut map = full_env();
        map.insert("TBSIGN_REQUEST_TIMEOUT_SECS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TBSIGN_REQUEST_TIMEOUT_SECS"
        ));
    }
}
