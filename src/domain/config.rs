//! Config - Application Configuration

use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, DEVICES_POLL_SECS, MAINTENANCE_POLL_SECS,
    MIN_POLL_SECS, NOTIFICATIONS_POLL_SECS, REQUEST_TIMEOUT_SECS, RULES_POLL_SECS,
    SAFETY_POLL_SECS, UPCOMING_DISPLAY_LIMIT, USERS_POLL_SECS,
};
use crate::i18n::Locale;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Gateway connection
    pub gateway: GatewayConfig,
    /// Per-section poll intervals
    pub polling: PollingConfig,
    /// Display options
    pub display: DisplayConfig,
    /// Logging options
    pub logging: LoggingConfig,
}

/// Gateway connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL, e.g. `http://localhost:8080/api`
    pub base_url: String,
    /// Bearer token; encrypted at rest by the config store
    pub token: Option<String>,
    /// Client-side deadline per request
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Poll intervals in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PollingConfig {
    pub devices: u64,
    pub rules: u64,
    pub maintenance: u64,
    pub notifications: u64,
    pub users: u64,
    pub safety: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            devices: DEVICES_POLL_SECS,
            rules: RULES_POLL_SECS,
            maintenance: MAINTENANCE_POLL_SECS,
            notifications: NOTIFICATIONS_POLL_SECS,
            users: USERS_POLL_SECS,
            safety: SAFETY_POLL_SECS,
        }
    }
}

impl PollingConfig {
    /// Interval clamped to the minimum poll period
    pub fn interval(secs: u64) -> Duration {
        Duration::from_secs(secs.max(MIN_POLL_SECS))
    }
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DisplayConfig {
    /// `en` or `zh`; detected from the system when unset
    pub locale: Option<String>,
    /// Rows in the "upcoming maintenance" list
    pub upcoming_limit: usize,
    /// Rows per list page
    pub page_size: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            locale: None,
            upcoming_limit: UPCOMING_DISPLAY_LIMIT,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl DisplayConfig {
    /// Configured locale, falling back to the system language
    pub fn locale(&self) -> Locale {
        match self.locale.as_deref().filter(|l| !l.trim().is_empty()) {
            Some(code) => Locale::from_code(code),
            None => {
                let current = locale_config::Locale::current().to_string();
                let lang = current.split_once('-').map_or(current.as_str(), |(l, _)| l);
                Locale::from_code(lang)
            }
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LoggingConfig {
    /// EnvFilter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Also write a daily rolling log file to the data directory
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [gateway]
            base_url = "https://iot.example.com/api"

            [polling]
            devices = 2
            "#,
        )
        .expect("parses");
        assert_eq!(config.gateway.base_url, "https://iot.example.com/api");
        assert_eq!(config.gateway.timeout_secs, REQUEST_TIMEOUT_SECS);
        assert_eq!(config.polling.rules, RULES_POLL_SECS);
        assert_eq!(
            PollingConfig::interval(config.polling.devices),
            Duration::from_secs(MIN_POLL_SECS)
        );
    }

    #[test]
    fn test_explicit_locale() {
        let display = DisplayConfig {
            locale: Some("zh".to_string()),
            ..Default::default()
        };
        assert_eq!(display.locale(), Locale::ZhCN);
    }
}
