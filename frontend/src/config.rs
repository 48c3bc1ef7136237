//! 编译期配置
//!
//! 所有值在构建时通过环境变量注入，缺省值面向本地开发。

use gatewise_shared::DEFAULT_PAGE_SIZE;
use thiserror::Error;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("{key} is not a valid log level: {value:?}")]
    InvalidLogLevel { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub ws_base_url: String,
    pub page_size: u32,
    pub log_level: log::Level,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            ws_base_url: ws_url_from(DEFAULT_API_BASE_URL),
            page_size: DEFAULT_PAGE_SIZE,
            log_level: log::Level::Info,
        }
    }
}

impl AppConfig {
    /// 从编译期环境变量加载配置，非法值回退到默认值
    ///
    /// 返回配置以及需要在日志初始化后输出的警告。
    pub fn from_env() -> (Self, Vec<ConfigError>) {
        Self::from_values(
            option_env!("GATEWISE_API_BASE_URL"),
            option_env!("GATEWISE_WS_BASE_URL"),
            option_env!("GATEWISE_PAGE_SIZE"),
            option_env!("GATEWISE_LOG_LEVEL"),
        )
    }

    fn from_values(
        api: Option<&str>,
        ws: Option<&str>,
        page_size: Option<&str>,
        log_level: Option<&str>,
    ) -> (Self, Vec<ConfigError>) {
        let mut warnings = Vec::new();
        let defaults = Self::default();

        let api_base_url = api
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.api_base_url);
        let ws_base_url = ws
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| ws_url_from(&api_base_url));

        let page_size = match page_size {
            None => defaults.page_size,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    warnings.push(ConfigError::InvalidNumber {
                        key: "GATEWISE_PAGE_SIZE",
                        value: raw.to_string(),
                    });
                    defaults.page_size
                }
            },
        };

        let log_level = match log_level {
            None => defaults.log_level,
            Some(raw) => raw.trim().parse::<log::Level>().unwrap_or_else(|_| {
                warnings.push(ConfigError::InvalidLogLevel {
                    key: "GATEWISE_LOG_LEVEL",
                    value: raw.to_string(),
                });
                defaults.log_level
            }),
        };

        (
            Self {
                api_base_url,
                ws_base_url,
                page_size,
                log_level,
            },
            warnings,
        )
    }
}

/// `http` → `ws`，`https` → `wss`
fn ws_url_from(api_base_url: &str) -> String {
    if let Some(rest) = api_base_url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = api_base_url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        api_base_url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let (config, warnings) = AppConfig::from_values(None, None, None, None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.ws_base_url, "ws://localhost:8000");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_ws_url_follows_api_scheme() {
        let (config, _) = AppConfig::from_values(Some("https://gate.example.com/"), None, None, None);
        assert_eq!(config.api_base_url, "https://gate.example.com");
        assert_eq!(config.ws_base_url, "wss://gate.example.com");
    }

    #[test]
    fn test_invalid_values_fall_back_with_warnings() {
        let (config, warnings) =
            AppConfig::from_values(None, Some("ws://cam:9000"), Some("0"), Some("loud"));
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.log_level, log::Level::Info);
        assert_eq!(config.ws_base_url, "ws://cam:9000");
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        let (config, warnings) = AppConfig::from_values(None, None, Some("25"), Some("DEBUG"));
        assert_eq!(config.page_size, 25);
        assert_eq!(config.log_level, log::Level::Debug);
        assert!(warnings.is_empty());
    }
}
