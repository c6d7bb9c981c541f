//! Build-time Configuration
//!
//! A CSR bundle has no process environment, so settings are baked in with
//! `option_env!` when the wasm is compiled.

use log::LevelFilter;

const DEFAULT_API_URL: &str = "https://localhost:5000/api";

/// Storage key of the auth token record
pub const TOKEN_KEY: &str = "auth_token";
/// Storage key prefix of the per-list layout mode
pub const LAYOUT_MODE_KEY_PREFIX: &str = "organizationMode_";
/// Storage key of the "do not show the info dialog again" flag
pub const HIDE_INFO_KEY: &str = "hideInfoIcon";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the board API, without trailing slash
    pub api_base_url: String,
    pub log_level: LevelFilter,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            log_level: LevelFilter::Info,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_values(option_env!("PENSE_BETE_API_URL"), option_env!("PENSE_BETE_LOG"))
    }

    fn from_values(api_url: Option<&str>, log_level: Option<&str>) -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: api_url
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.api_base_url),
            log_level: log_level
                .and_then(|level| level.trim().parse().ok())
                .unwrap_or(defaults.log_level),
        }
    }
}
