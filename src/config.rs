//! Process configuration, read once at startup from `HOSTEL_*` environment variables.

use crate::error::ConfigError;
use sqlx::mysql::MySqlConnectOptions;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Connection settings for the MySQL server holding the hostel schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Database (schema) name; created by `init-db` when absent.
    pub name: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    /// Options for connecting to the server without selecting a database.
    pub fn server_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
    }

    /// Options for connecting straight into the hostel database.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        self.server_options().database(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
    pub body_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub schema_path: PathBuf,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database = DatabaseConfig {
            host: text("HOSTEL_DB_HOST", "localhost"),
            port: parse(&lookup, "HOSTEL_DB_PORT", 3306)?,
            user: text("HOSTEL_DB_USER", "root"),
            password: text("HOSTEL_DB_PASSWORD", ""),
            name: text("HOSTEL_DB_NAME", "hostel_management"),
            max_connections: parse(&lookup, "HOSTEL_DB_MAX_CONNECTIONS", 5)?,
            acquire_timeout: Duration::from_millis(parse(&lookup, "HOSTEL_DB_ACQUIRE_TIMEOUT_MS", 5000)?),
        };
        if database.name.is_empty() {
            return Err(ConfigError::Invalid {
                key: "HOSTEL_DB_NAME",
                value: String::new(),
            });
        }

        let cors_origins = lookup("HOSTEL_CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let server = ServerConfig {
            bind_addr: parse(&lookup, "HOSTEL_BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 5000)))?,
            cors_origins,
            body_limit: parse(&lookup, "HOSTEL_BODY_LIMIT", 1024 * 1024)?,
        };

        Ok(Self {
            database,
            server,
            schema_path: PathBuf::from(text("HOSTEL_SCHEMA_PATH", "schema.sql")),
        })
    }
}

fn parse<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
