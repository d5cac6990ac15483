mod settings;

pub use settings::{DatabaseConfig, NotificationConfig, Settings, TelemetryConfig};
