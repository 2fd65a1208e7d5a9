use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: Option<ScoringConfig>,
    pub persistence: PersistenceConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let scoring = match env::var("SCORING_BASE_URL") {
            Ok(base_url) if !base_url.trim().is_empty() => {
                let timeout_secs = env::var("SCORING_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "120".to_string())
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidScoringTimeout)?;
                Some(ScoringConfig {
                    base_url: base_url.trim().trim_end_matches('/').to_string(),
                    api_key: env::var("SCORING_API_KEY").unwrap_or_default(),
                    timeout: Duration::from_secs(timeout_secs),
                })
            }
            _ => None,
        };

        let max_attempts = env::var("PIPELINE_PERSIST_ATTEMPTS")
            .unwrap_or_else(|_| "1".to_string())
            .parse::<u32>()
            .ok()
            .filter(|attempts| *attempts > 0)
            .ok_or(ConfigError::InvalidPersistAttempts)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring,
            persistence: PersistenceConfig { max_attempts },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Connection settings for the remote scoring and generation functions.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

/// Write-behind behavior for pipeline persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceConfig {
    pub max_attempts: u32,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self { max_attempts: 1 }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidScoringTimeout,
    InvalidPersistAttempts,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidScoringTimeout => {
                write!(f, "SCORING_TIMEOUT_SECS must be a whole number of seconds")
            }
            ConfigError::InvalidPersistAttempts => {
                write!(f, "PIPELINE_PERSIST_ATTEMPTS must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidScoringTimeout
            | ConfigError::InvalidPersistAttempts => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "SCORING_BASE_URL",
            "SCORING_API_KEY",
            "SCORING_TIMEOUT_SECS",
            "PIPELINE_PERSIST_ATTEMPTS",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.scoring.is_none());
        assert_eq!(config.persistence.max_attempts, 1);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn scoring_settings_trim_trailing_slash() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCORING_BASE_URL", "https://functions.example.com/");
        env::set_var("SCORING_API_KEY", "anon-key");
        env::set_var("SCORING_TIMEOUT_SECS", "30");
        let config = AppConfig::load().expect("config loads");
        let scoring = config.scoring.expect("scoring configured");
        assert_eq!(scoring.base_url, "https://functions.example.com");
        assert_eq!(scoring.api_key, "anon-key");
        assert_eq!(scoring.timeout, Duration::from_secs(30));
        reset_env();
    }

    #[test]
    fn rejects_zero_persist_attempts() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("PIPELINE_PERSIST_ATTEMPTS", "0");
        let err = AppConfig::load().expect_err("zero attempts rejected");
        assert!(matches!(err, ConfigError::InvalidPersistAttempts));
        reset_env();
    }
}
