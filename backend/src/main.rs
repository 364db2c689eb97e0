//! User directory entry-point: loads configuration, prepares the store and
//! serves the REST API.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use user_directory::config::AppSettings;
use user_directory::inbound::http::health::HealthState;
use user_directory::outbound::persistence::{DbPool, run_pending_migrations};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| io::Error::other(format!("failed to load configuration: {err}")))?;
    let mut config = ServerConfig::new(settings.bind_addr()?, settings.role_priority());

    if let Some(pool_config) = settings.pool_config() {
        let database_url = pool_config.database_url().to_owned();
        let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&database_url))
            .await
            .map_err(|err| io::Error::other(format!("migration task failed: {err}")))?
            .map_err(|err| io::Error::other(err.to_string()))?;
        info!(applied, "database migrations applied");

        let pool = DbPool::new(pool_config)
            .await
            .map_err(|err| io::Error::other(err.to_string()))?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome
}
