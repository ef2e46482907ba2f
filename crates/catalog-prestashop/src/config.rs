use crate::error::ConfigError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str = "catalog-bridge/0.1 (product-sync)";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Connection settings for one PrestaShop webservice.
#[derive(Clone)]
pub struct PrestashopConfig {
    /// Shop root, e.g. `https://shop.example.com`. The `/api/...` paths are
    /// resolved below it.
    pub base_url: String,
    /// Webservice key, sent as the Basic-auth username with an empty password.
    pub api_key: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub log_level: String,
}

impl PrestashopConfig {
    /// Builds a configuration with default timeout, user agent and log level.
    #[must_use]
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.to_owned(),
            api_key: api_key.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
        }
    }
}

impl std::fmt::Debug for PrestashopConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrestashopConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("log_level", &self.log_level)
            .finish()
    }
}

/// Load the webservice configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_config() -> Result<PrestashopConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_config_from_env()
}

/// Load the webservice configuration from variables already in the process.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_config_from_env() -> Result<PrestashopConfig, ConfigError> {
    build_config(|key| std::env::var(key))
}

/// Parsing and validation core, decoupled from the process environment so it
/// can be tested with a plain `HashMap` lookup.
fn build_config<F>(lookup: F) -> Result<PrestashopConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let base_url = require("PRESTASHOP_BASE_URL")?;
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "PRESTASHOP_BASE_URL".to_string(),
            reason: format!("expected an http(s) URL, got '{base_url}'"),
        });
    }

    let api_key = require("PRESTASHOP_API_KEY")?;

    let timeout_secs = match lookup("PRESTASHOP_TIMEOUT_SECS") {
        Ok(raw) => raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: "PRESTASHOP_TIMEOUT_SECS".to_string(),
            reason: e.to_string(),
        })?,
        Err(_) => DEFAULT_TIMEOUT_SECS,
    };
    if timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PRESTASHOP_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(PrestashopConfig {
        base_url,
        api_key,
        timeout_secs,
        user_agent: or_default("PRESTASHOP_USER_AGENT", DEFAULT_USER_AGENT),
        log_level: or_default("PRESTASHOP_LOG_LEVEL", DEFAULT_LOG_LEVEL),
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
