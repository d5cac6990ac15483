use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Page size applied when `list` gets no explicit limit
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,
    /// Hard ceiling for caller-supplied limits
    #[serde(default = "default_max_page_size")]
    pub max_page_size: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Emit JSON log lines instead of the human-readable format
    #[serde(default)]
    pub json_logs: bool,
}

fn default_pool_size() -> u32 {
    5
}

fn default_connect_timeout() -> u64 {
    5 // seconds
}

fn default_idle_timeout() -> u64 {
    600 // 10 minutes
}

fn default_page_size() -> i64 {
    50
}

fn default_max_page_size() -> i64 {
    200
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("database.url", "postgres://localhost:5432/events")?
            .set_default("database.pool_size", 5)?
            .set_default("notifications.default_page_size", 50)?
            .set_default("notifications.max_page_size", 200)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // DATABASE_URL, DATABASE_POOL_SIZE, TELEMETRY_JSON_LOGS, etc.
            .add_source(
                Environment::default()
                    .separator("_")
                    .try_parsing(true)
                    .list_separator(","),
            );

        builder.build()?.try_deserialize()
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { json_logs: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let notifications = NotificationConfig::default();
        assert_eq!(notifications.default_page_size, 50);
        assert_eq!(notifications.max_page_size, 200);

        let telemetry = TelemetryConfig::default();
        assert!(!telemetry.json_logs);
    }
}
