use persistence::db::DatabaseConfig;
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    /// Ledger gateway used for cache-miss fallback reads. Optional: the
    /// whole system runs cache-only without it.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Client synchronization loop settings.
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub invitations: InvitationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Whether cache-miss reads fall back to the ledger at all.
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of the ledger RPC node (required if enabled).
    #[serde(default)]
    pub rpc_url: String,

    /// Request attempts per lookup before giving up.
    #[serde(default = "default_ledger_attempts")]
    pub attempts: u32,

    /// Fixed delay between attempts.
    #[serde(default = "default_ledger_retry_delay")]
    pub retry_delay_ms: u64,

    /// Per-attempt request timeout.
    #[serde(default = "default_ledger_timeout")]
    pub timeout_ms: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            rpc_url: String::new(),
            attempts: default_ledger_attempts(),
            retry_delay_ms: default_ledger_retry_delay(),
            timeout_ms: default_ledger_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Poll interval for the circle watcher.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvitationConfig {
    /// Default lifetime of an invitation token, in days.
    #[serde(default = "default_expiration_days")]
    pub expiration_days: i64,

    /// Base URL used to build join links (e.g. https://app.example.com).
    #[serde(default = "default_join_base_url")]
    pub join_base_url: String,
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            expiration_days: default_expiration_days(),
            join_base_url: default_join_base_url(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_ledger_attempts() -> u32 {
    3
}
fn default_ledger_retry_delay() -> u64 {
    500
}
fn default_ledger_timeout() -> u64 {
    5000
}
fn default_poll_interval() -> u64 {
    5
}
fn default_expiration_days() -> i64 {
    7
}
fn default_join_base_url() -> String {
    "http://localhost:5173".to_string()
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with CC__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("CC").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Builds entirely from embedded defaults so tests never depend on the
    /// filesystem. Validation is skipped to allow partial configs.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "127.0.0.1"
            port = 0
            request_timeout_secs = 30

            [database]
            path = ":memory:"
            max_connections = 1
            connect_timeout_secs = 10
            busy_timeout_secs = 5

            [logging]
            level = "debug"
            format = "pretty"

            [security]
            cors_origins = []

            [ledger]
            enabled = false
            rpc_url = ""
            attempts = 3
            retry_delay_ms = 50
            timeout_ms = 1000

            [sync]
            poll_interval_secs = 5

            [invitations]
            expiration_days = 7
            join_base_url = "http://localhost:5173"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.path.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "CC__DATABASE__PATH environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.ledger.enabled && self.ledger.rpc_url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "ledger.rpc_url must be set when the ledger gateway is enabled".to_string(),
            ));
        }

        if self.ledger.attempts == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "ledger.attempts must be at least 1".to_string(),
            ));
        }

        if self.sync.poll_interval_secs == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "sync.poll_interval_secs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .expect("Invalid socket address")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_load_with_defaults() {
        let config = Config::load_for_test(&[]).expect("Failed to load config");

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.database.path, ":memory:");
        assert_eq!(config.logging.level, "debug");
        assert!(!config.ledger.enabled);
        assert_eq!(config.sync.poll_interval_secs, 5);
        assert_eq!(config.invitations.expiration_days, 7);
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::load_for_test(&[
            ("server.port", "9000"),
            ("ledger.enabled", "true"),
            ("ledger.rpc_url", "http://localhost:8899"),
        ])
        .expect("Failed to load config");

        assert_eq!(config.server.port, 9000);
        assert!(config.ledger.enabled);
        assert_eq!(config.ledger.rpc_url, "http://localhost:8899");
    }

    #[test]
    fn test_validation_rejects_empty_database_path() {
        let config = Config::load_for_test(&[("database.path", "")]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_enabled_ledger_without_url() {
        let config = Config::load_for_test(&[
            ("server.port", "8080"),
            ("ledger.enabled", "true"),
        ])
        .unwrap();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("rpc_url"));
    }

    #[test]
    fn test_validation_rejects_zero_attempts() {
        let config = Config::load_for_test(&[
            ("server.port", "8080"),
            ("ledger.attempts", "0"),
        ])
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = Config::load_for_test(&[("server.port", "3000")]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
    }
}
