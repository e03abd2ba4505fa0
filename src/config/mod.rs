use std::env;

use crate::error::AppError;
use crate::view::Mode;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendConfig,
    pub logging: LoggingConfig,
    pub request: RequestConfig,
    pub navigator: NavigatorConfig,
}

/// Graph backend configuration
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub timeout_ms: u64,
}

/// Session defaults for a navigator
#[derive(Debug, Clone, Default)]
pub struct NavigatorConfig {
    pub default_mode: Mode,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url =
            env::var("NAVIGATOR_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::Config {
                message: format!("NAVIGATOR_BASE_URL must be an http(s) URL, got '{}'", base_url),
            });
        }
        let backend = BackendConfig { base_url };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let request = RequestConfig {
            timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30000),
        };

        let default_mode = match env::var("NAVIGATOR_DEFAULT_MODE") {
            Ok(raw) => raw.parse::<Mode>().map_err(|message| AppError::Config { message })?,
            Err(_) => Mode::default(),
        };

        Ok(Config {
            backend,
            logging,
            request,
            navigator: NavigatorConfig { default_mode },
        })
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
        }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self { timeout_ms: 30000 }
    }
}
