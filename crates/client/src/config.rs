//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `TEAHOUSE_API_URL` - Forms backend base URL (default: `http://127.0.0.1:3000`)
//! - `TEAHOUSE_DATA_DIR` - Directory for persisted stores (default: `.teahouse`)
//! - `TEAHOUSE_GEO_URL` - IP geolocation endpoint (default: `https://ipapi.co/json/`)
//! - `TEAHOUSE_GEO_TIMEOUT_MS` - Lookup bound in milliseconds (default: 3000)
//! - `TEAHOUSE_GEO_DISABLED` - Skip the IP lookup entirely when set to `1`/`true`
//! - `TZ` - IANA timezone used for timezone-based detection
//! - `LANG` - Locale used for the language fallback

use std::path::PathBuf;
use std::time::Duration;

use teahouse_core::region::ClientEnvironment;
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_DATA_DIR: &str = ".teahouse";
pub const DEFAULT_GEO_URL: &str = "https://ipapi.co/json/";
pub const DEFAULT_GEO_TIMEOUT_MS: u64 = 3000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client-side configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Forms backend base URL
    pub api_url: Url,
    /// Where store files live
    pub data_dir: PathBuf,
    /// IP geolocation endpoint
    pub geo_url: Url,
    /// Upper bound on the IP lookup
    pub geo_timeout: Duration,
    /// Skip the IP lookup and go straight to timezone detection
    pub geo_disabled: bool,
    /// Timezone and locale reported by the host
    pub environment: ClientEnvironment,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_url("TEAHOUSE_API_URL", DEFAULT_API_URL)?;
        let geo_url = parse_url("TEAHOUSE_GEO_URL", DEFAULT_GEO_URL)?;
        let data_dir = PathBuf::from(get_env_or_default("TEAHOUSE_DATA_DIR", DEFAULT_DATA_DIR));
        let geo_timeout_ms = get_env_or_default(
            "TEAHOUSE_GEO_TIMEOUT_MS",
            &DEFAULT_GEO_TIMEOUT_MS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar("TEAHOUSE_GEO_TIMEOUT_MS".to_string(), e.to_string()))?;
        let geo_disabled = parse_flag("TEAHOUSE_GEO_DISABLED")?;

        Ok(Self {
            api_url,
            data_dir,
            geo_url,
            geo_timeout: Duration::from_millis(geo_timeout_ms),
            geo_disabled,
            environment: environment_from_env(),
        })
    }
}

/// Timezone and locale from `TZ` and `LC_ALL`/`LANG`.
#[must_use]
pub fn environment_from_env() -> ClientEnvironment {
    ClientEnvironment {
        timezone: get_optional_env("TZ").map(|tz| tz.trim_start_matches(':').to_string()),
        locale: get_optional_env("LC_ALL").or_else(|| get_optional_env("LANG")),
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional, non-empty environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_url(key: &str, default: &str) -> Result<Url, ConfigError> {
    Url::parse(&get_env_or_default(key, default))
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_flag(key: &str) -> Result<bool, ConfigError> {
    match get_optional_env(key).as_deref().map(str::to_ascii_lowercase).as_deref() {
        None | Some("0" | "false" | "no") => Ok(false),
        Some("1" | "true" | "yes") => Ok(true),
        Some(other) => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}
