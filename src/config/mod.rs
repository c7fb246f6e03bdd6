use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub providers: ProviderConfig,
    pub bot: BotConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    /// Hex-encoded SHA-256 of the admin panel password.
    pub admin_password_sha256: String,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub analysis_url: String,
    pub analysis_api_key: String,
    pub transcription_url: String,
    pub transcription_api_key: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    pub api_url: String,
    pub token: String,
    pub poll_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Environment-tiered defaults, then specific env vars on top.
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("ADMIN_PASSWORD_SHA256") {
            self.security.admin_password_sha256 = v;
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        if let Ok(v) = env::var("ANALYSIS_PROVIDER_URL") {
            self.providers.analysis_url = v;
        }
        if let Ok(v) = env::var("ANALYSIS_PROVIDER_API_KEY") {
            self.providers.analysis_api_key = v;
        }
        if let Ok(v) = env::var("TRANSCRIPTION_PROVIDER_URL") {
            self.providers.transcription_url = v;
        }
        if let Ok(v) = env::var("TRANSCRIPTION_PROVIDER_API_KEY") {
            self.providers.transcription_api_key = v;
        }
        if let Ok(v) = env::var("PROVIDER_REQUEST_TIMEOUT_SECS") {
            self.providers.request_timeout_secs =
                v.parse().unwrap_or(self.providers.request_timeout_secs);
        }

        if let Ok(v) = env::var("BOT_API_URL") {
            self.bot.api_url = v;
        }
        if let Ok(v) = env::var("BOT_TOKEN") {
            self.bot.token = v;
        }
        if let Ok(v) = env::var("BOT_POLL_TIMEOUT_SECS") {
            self.bot.poll_timeout_secs = v.parse().unwrap_or(self.bot.poll_timeout_secs);
        }

        self
    }

    fn base(environment: Environment) -> Self {
        Self {
            environment,
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                admin_password_sha256: String::new(),
                enable_cors: true,
                cors_origins: vec![],
            },
            providers: ProviderConfig {
                analysis_url: String::new(),
                analysis_api_key: String::new(),
                transcription_url: String::new(),
                transcription_api_key: String::new(),
                request_timeout_secs: 30,
            },
            bot: BotConfig {
                api_url: "https://api.telegram.org".to_string(),
                token: String::new(),
                poll_timeout_secs: 30,
            },
        }
    }

    fn development() -> Self {
        let mut config = Self::base(Environment::Development);
        config.security.jwt_expiry_hours = 24 * 7;
        config.security.cors_origins = vec![
            "http://localhost:3000".to_string(),
            "http://localhost:5173".to_string(),
        ];
        config
    }

    fn staging() -> Self {
        let mut config = Self::base(Environment::Staging);
        config.database.max_connections = 20;
        config.database.connection_timeout = 10;
        config
    }

    fn production() -> Self {
        let mut config = Self::base(Environment::Production);
        config.database.max_connections = 50;
        config.database.connection_timeout = 5;
        config.security.jwt_expiry_hours = 4;
        config.providers.request_timeout_secs = 15;
        config
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults() {
        let config = AppConfig::development();
        assert_eq!(config.security.jwt_expiry_hours, 24 * 7);
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn production_tightens_limits() {
        let config = AppConfig::production();
        assert_eq!(config.security.jwt_expiry_hours, 4);
        assert_eq!(config.database.max_connections, 50);
        assert_eq!(config.providers.request_timeout_secs, 15);
    }
}
