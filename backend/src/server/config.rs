//! Application settings loaded via OrthoConfig.
//!
//! Sources, lowest precedence first: defaults, an optional config file,
//! `KONTAKTAR_*` environment variables, then command-line flags.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use kontaktar_backend::inbound::http::cors::{AllowedOrigins, InvalidOrigin};
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5001";
const DEFAULT_STORE_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Settings rejected after loading.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("bind address `{value}` is not a socket address: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("store timeout must be greater than zero")]
    ZeroStoreTimeout,
    #[error("database pool needs at least one connection")]
    ZeroConnections,
    #[error(transparent)]
    InvalidCorsOrigin(#[from] InvalidOrigin),
}

/// Process-wide settings.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "KONTAKTAR")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. Without it users are kept in memory.
    pub database_url: Option<String>,
    /// Identity-provider signing secret, usually prefixed `whsec_`.
    pub webhook_secret: Option<String>,
    /// Upper bound on a single user-store call, in milliseconds.
    pub store_timeout_ms: Option<u64>,
    /// Maximum pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Comma-separated browser origins allowed to call the API. Unset
    /// reflects any origin.
    pub cors_origin: Option<String>,
}

impl AppSettings {
    /// Listening address, falling back to `0.0.0.0:5001`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                source,
            })
    }

    /// Per-call store timeout, falling back to ten seconds.
    pub fn store_timeout(&self) -> Result<Duration, SettingsError> {
        match self.store_timeout_ms.unwrap_or(DEFAULT_STORE_TIMEOUT_MS) {
            0 => Err(SettingsError::ZeroStoreTimeout),
            ms => Ok(Duration::from_millis(ms)),
        }
    }

    /// Pool size, falling back to ten.
    pub fn db_max_connections(&self) -> Result<u32, SettingsError> {
        match self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS) {
            0 => Err(SettingsError::ZeroConnections),
            n => Ok(n),
        }
    }

    /// Browser origins allowed by the CORS layer.
    pub fn cors_origins(&self) -> Result<AllowedOrigins, SettingsError> {
        Ok(AllowedOrigins::parse(self.cors_origin.as_deref())?)
    }

    /// Signing secret, treating an empty value as unset.
    pub fn webhook_secret(&self) -> Option<&str> {
        self.webhook_secret.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Database URL, treating an empty value as unset.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref().filter(|s| !s.trim().is_empty())
    }
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "<redacted>"))
            .field("store_timeout_ms", &self.store_timeout_ms)
            .field("db_max_connections", &self.db_max_connections)
            .field("cors_origin", &self.cors_origin)
            .finish()
    }
}
