use std::env;
use tracing::{debug, warn};

use crate::config::ConfigError;

/// HTTP listener and CORS settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; empty means every origin is accepted
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Load the listener configuration.
    ///
    /// - APP_HOST (defaults to 0.0.0.0)
    /// - PORT, then APP_PORT (defaults to 3000)
    /// - CORS_ALLOWED_ORIGINS: comma separated list (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = match env::var("PORT").or_else(|_| env::var("APP_PORT")) {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue(format!("Invalid port value: {}", raw)))?,
            Err(_) => {
                debug!("PORT not set, using default: 3000");
                3000
            }
        };

        let cors_allowed_origins = parse_origins(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());
        if cors_allowed_origins.is_empty() {
            warn!("CORS_ALLOWED_ORIGINS not set, every origin will be accepted");
        }

        let config = AppConfig { host, port, cors_allowed_origins };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::ValidationError("Host cannot be empty".to_string()));
        }
        if self.port == 0 {
            return Err(ConfigError::ValidationError("Port cannot be 0".to_string()));
        }
        Ok(())
    }

    pub fn from_test_env() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 3001,
            cors_allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_allowed_origins: Vec::new(),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
