//! API configuration

use serde::Deserialize;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Log level
    pub log_level: String,
    /// Directory where receipt files are stored
    pub receipt_dir: String,
    /// Course platform base URL
    pub platform_base_url: String,
    /// Course platform API key
    pub platform_api_key: String,
    /// Master switch for the course platform integration
    pub platform_enabled: bool,
    /// Chat gateway base URL
    pub chat_base_url: String,
    /// Chat gateway API key
    pub chat_api_key: String,
    /// Timeout for outbound integration calls, in milliseconds
    pub integration_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/enrollment".to_string(),
            log_level: "info".to_string(),
            receipt_dir: "./receipts".to_string(),
            platform_base_url: "http://localhost:9000/api/v1".to_string(),
            platform_api_key: String::new(),
            platform_enabled: false,
            chat_base_url: "http://localhost:9001/api/v1".to_string(),
            chat_api_key: String::new(),
            integration_timeout_ms: 10_000,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment variables prefixed with `API_`
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Timeout for outbound integration calls
    pub fn integration_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.integration_timeout_ms)
    }
}
