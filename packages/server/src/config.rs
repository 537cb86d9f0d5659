//! Relay configuration from command-line flags and environment variables.

use std::time::Duration;

use axum::http::HeaderValue;
use clap::Parser;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Configuration errors, fatal at startup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("Invalid allowed origin '{0}'")]
    InvalidOrigin(String),
}

#[derive(Parser, Debug, Clone)]
#[command(name = "hiroba-server")]
#[command(about = "Room-scoped WebSocket relay server", long_about = None)]
pub struct RelayConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HIROBA_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "HIROBA_PORT", default_value = "8080")]
    pub port: u16,

    /// How often the server pings each connection, in milliseconds
    #[arg(long, env = "HIROBA_HEARTBEAT_INTERVAL_MS", default_value = "25000")]
    pub heartbeat_interval_ms: u64,

    /// How long a ping may go unanswered before the connection is dropped, in milliseconds
    #[arg(long, env = "HIROBA_HEARTBEAT_TIMEOUT_MS", default_value = "20000")]
    pub heartbeat_timeout_ms: u64,

    /// Comma-separated origins allowed to connect. Empty allows any origin.
    #[arg(long, env = "HIROBA_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "HIROBA_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl RelayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.heartbeat_interval_ms == 0 {
            return Err(ConfigError::ZeroDuration("heartbeat interval"));
        }
        if self.heartbeat_timeout_ms == 0 {
            return Err(ConfigError::ZeroDuration("heartbeat timeout"));
        }
        self.origin_header_values().map(|_| ())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_millis(self.heartbeat_timeout_ms)
    }

    /// Allowed origins with surrounding whitespace and empty entries dropped
    pub fn origins(&self) -> Vec<String> {
        self.allowed_origins
            .iter()
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn origin_header_values(&self) -> Result<Vec<HeaderValue>, ConfigError> {
        self.origins()
            .into_iter()
            .map(|origin| {
                HeaderValue::from_str(&origin).map_err(|_| ConfigError::InvalidOrigin(origin))
            })
            .collect()
    }

    /// CORS policy for the HTTP endpoints
    pub fn cors_layer(&self) -> Result<CorsLayer, ConfigError> {
        let origins = self.origin_header_values()?;
        let allow_origin = if origins.is_empty() {
            AllowOrigin::from(Any)
        } else {
            AllowOrigin::list(origins)
        };
        Ok(CorsLayer::new().allow_origin(allow_origin).allow_methods(Any))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // テスト項目: 引数なしの場合はデフォルト値が使われる
        // given (前提条件):
        let args = ["hiroba-server"];

        // when (操作):
        let config = RelayConfig::try_parse_from(args).unwrap();

        // then (期待する結果):
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.heartbeat_interval(), Duration::from_secs(25));
        assert_eq!(config.heartbeat_timeout(), Duration::from_secs(20));
        assert!(config.origins().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags_override_defaults() {
        // テスト項目: フラグでハートビートと許可オリジンを指定できる
        // given (前提条件):
        let args = [
            "hiroba-server",
            "--port",
            "3000",
            "--heartbeat-interval-ms",
            "1000",
            "--heartbeat-timeout-ms",
            "500",
            "--allowed-origins",
            "https://a.example, https://b.example,",
        ];

        // when (操作):
        let config = RelayConfig::try_parse_from(args).unwrap();

        // then (期待する結果):
        assert_eq!(config.port, 3000);
        assert_eq!(config.heartbeat_interval(), Duration::from_millis(1000));
        assert_eq!(config.heartbeat_timeout(), Duration::from_millis(500));
        assert_eq!(
            config.origins(),
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert!(config.cors_layer().is_ok());
    }

    #[test]
    fn test_zero_heartbeat_is_rejected() {
        // テスト項目: 0 のハートビート値は設定エラーになる
        // given (前提条件):
        let config =
            RelayConfig::try_parse_from(["hiroba-server", "--heartbeat-timeout-ms", "0"]).unwrap();

        // when (操作):
        let result = config.validate();

        // then (期待する結果):
        assert_eq!(result, Err(ConfigError::ZeroDuration("heartbeat timeout")));
    }

    #[test]
    fn test_invalid_origin_is_rejected() {
        // テスト項目: ヘッダー値として不正なオリジンは設定エラーになる
        // given (前提条件):
        let config =
            RelayConfig::try_parse_from(["hiroba-server", "--allowed-origins", "bad\norigin"])
                .unwrap();

        // when (操作):
        let result = config.validate();

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ConfigError::InvalidOrigin("bad\norigin".to_string()))
        );
    }
}
