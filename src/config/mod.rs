use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub auth_port: u16,
    pub notes_port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub url: Option<String>,
    pub name: Option<String>,
    pub notes_table: String,
    pub accounts_table: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub store_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("AUTH_PORT") {
            self.server.auth_port = v.parse().unwrap_or(self.server.auth_port);
        }
        if let Ok(v) = env::var("NOTES_PORT") {
            self.server.notes_port = v.parse().unwrap_or(self.server.notes_port);
        }

        // Database overrides; the short names are the ones the legacy .env files used
        if let Ok(v) = env::var("STORE_BACKEND") {
            self.database.backend = match v.to_ascii_lowercase().as_str() {
                "memory" => StoreBackend::Memory,
                _ => StoreBackend::Postgres,
            };
        }
        if let Some(v) = first_var(&["DATABASE_URL", "URI"]) {
            self.database.url = Some(v);
        }
        if let Some(v) = first_var(&["DATABASE_NAME", "DB"]) {
            self.database.name = Some(v);
        }
        if let Some(v) = first_var(&["NOTES_TABLE", "Note"]) {
            self.database.notes_table = v;
        }
        if let Ok(v) = env::var("ACCOUNTS_TABLE") {
            self.database.accounts_table = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("STORE_TIMEOUT_MS") {
            self.database.store_timeout_ms = v.parse().unwrap_or(self.database.store_timeout_ms);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    /// Checks everything the services need before they may accept traffic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.backend == StoreBackend::Postgres {
            match self.database.url.as_deref() {
                None | Some("") => return Err(ConfigError::Missing("DATABASE_URL")),
                Some(url) => {
                    url::Url::parse(url).map_err(|_| ConfigError::Invalid {
                        var: "DATABASE_URL",
                        value: "<unparseable connection string>".to_string(),
                    })?;
                }
            }
        }

        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }

        for (var, name) in [
            ("NOTES_TABLE", &self.database.notes_table),
            ("ACCOUNTS_TABLE", &self.database.accounts_table),
        ] {
            if !is_identifier(name) {
                return Err(ConfigError::Invalid { var, value: name.clone() });
            }
        }

        if self.server.auth_port == self.server.notes_port {
            return Err(ConfigError::Invalid {
                var: "NOTES_PORT",
                value: format!("{} (same as AUTH_PORT)", self.server.notes_port),
            });
        }

        Ok(())
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::default(),
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                name: None,
                notes_table: "notes".to_string(),
                accounts_table: "accounts".to_string(),
                max_connections: 10,
                connection_timeout: 30,
                store_timeout_ms: 5_000,
            },
            security: SecurityConfig {
                jwt_secret: "authentic".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                cors_origins: vec![
                    "http://localhost:5173".to_string(),
                    "https://localhost:5173".to_string(),
                ],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig::default(),
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                name: None,
                notes_table: "notes".to_string(),
                accounts_table: "accounts".to_string(),
                max_connections: 20,
                connection_timeout: 10,
                store_timeout_ms: 3_000,
            },
            security: SecurityConfig {
                jwt_secret: "authentic-staging".to_string(),
                jwt_expiry_hours: 24,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig::default(),
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: None,
                name: None,
                notes_table: "notes".to_string(),
                accounts_table: "accounts".to_string(),
                max_connections: 50,
                connection_timeout: 5,
                store_timeout_ms: 2_000,
            },
            security: SecurityConfig {
                // Must come from JWT_SECRET
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            auth_port: 3001,
            notes_port: 3000,
        }
    }
}

fn first_var(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| env::var(name).ok())
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}
