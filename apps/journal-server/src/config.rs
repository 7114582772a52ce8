//! Application configuration loaded from environment variables.

use std::env;

use journal_infra::{DatabaseConfig, JwtConfig};

const DEFAULT_DATABASE_URL: &str = "sqlite://learning_journal.db?mode=rwc";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    /// Run pending migrations at startup.
    pub auto_migrate: bool,
    pub session: JwtConfig,
    /// Set the `Secure` flag on cookies.
    pub cookie_secure: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(10),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(1),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            auto_migrate: flag("DB_AUTO_MIGRATE").unwrap_or(true),
            session: JwtConfig::from_env(),
            cookie_secure: flag("COOKIE_SECURE").unwrap_or(false),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

fn flag(key: &str) -> Option<bool> {
    env::var(key)
        .ok()
        .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no" | "off"))
}
