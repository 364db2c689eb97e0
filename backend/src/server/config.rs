//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use user_directory::domain::RolePriority;
use user_directory::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) role_priority: RolePriority,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration serving the in-memory directory.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, role_priority: RolePriority) -> Self {
        Self {
            bind_addr,
            role_priority,
            db_pool: None,
        }
    }

    /// Serve the directory from PostgreSQL through `pool`.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
