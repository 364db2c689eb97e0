//! Service configuration loaded via OrthoConfig.
//!
//! Values merge from defaults, a configuration file, `USER_DIRECTORY_*`
//! environment variables and command-line flags, later sources winning.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::RolePriority;
use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Configuration values for the user directory service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_DIRECTORY")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string; the seeded in-memory directory is used
    /// when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Role names, highest priority first, replacing the default ranking.
    pub role_priority: Option<Vec<String>>,
}

impl AppSettings {
    /// The configured bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// Returns [`std::io::ErrorKind::InvalidInput`] for an unparseable
    /// address.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid bind address {raw:?}: {err}"),
            )
        })
    }

    /// The configured pool limit, falling back to 10.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Pool settings for the configured database, if any.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url
            .as_deref()
            .map(|url| PoolConfig::new(url).with_max_size(self.db_max_connections()))
    }

    /// The role ranking to sort with.
    pub fn role_priority(&self) -> RolePriority {
        match &self.role_priority {
            Some(names) if !names.is_empty() => RolePriority::new(names),
            _ => RolePriority::default(),
        }
    }
}
