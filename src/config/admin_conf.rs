use std::env;
use tracing::{error, info};

use crate::config::ConfigError;

/// Shared secret guarding the admin surface
#[derive(Clone)]
pub struct AdminConfig {
    pub password: String,
}

// Keeps the secret out of debug logs.
impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig").field("password", &"[REDACTED]").finish()
    }
}

impl AdminConfig {
    /// ADMIN_PASSWORD is required; there is no built-in fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        let password = env::var("ADMIN_PASSWORD").map_err(|_| {
            error!("ADMIN_PASSWORD environment variable not found");
            ConfigError::EnvVarNotFound("ADMIN_PASSWORD".to_string())
        })?;

        let config = AdminConfig { password };
        config.validate()?;
        info!("Admin configuration loaded");
        Ok(config)
    }

    pub fn from_test_env() -> Self {
        AdminConfig { password: "test-admin-secret".to_string() }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.password.trim().is_empty() {
            error!("ADMIN_PASSWORD is empty");
            return Err(ConfigError::ValidationError("Admin password cannot be empty".to_string()));
        }
        Ok(())
    }
}
