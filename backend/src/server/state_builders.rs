//! Builders for the HTTP state backing the directory endpoints.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use user_directory::domain::ports::UserDirectoryRepository;
use user_directory::domain::{RolePriority, UserDirectoryService};
use user_directory::inbound::http::state::HttpState;
use user_directory::outbound::memory::InMemoryUserDirectoryRepository;
use user_directory::outbound::persistence::{DbPool, DieselUserDirectoryRepository};

fn state_over<R>(repo: R, priority: RolePriority) -> web::Data<HttpState>
where
    R: UserDirectoryRepository + 'static,
{
    let service = UserDirectoryService::new(Arc::new(repo), priority);
    web::Data::new(HttpState::from_service(Arc::new(service)))
}

/// Build handler state over PostgreSQL when a pool is configured, otherwise
/// over the seeded in-memory directory.
///
/// # Errors
/// Returns [`std::io::Error`] if the in-memory seed data fails validation.
pub(crate) fn build_http_state(
    pool: Option<&DbPool>,
    priority: RolePriority,
) -> std::io::Result<web::Data<HttpState>> {
    match pool {
        Some(pool) => {
            info!("serving the user directory from PostgreSQL");
            Ok(state_over(
                DieselUserDirectoryRepository::new(pool.clone()),
                priority,
            ))
        }
        None => {
            warn!("no database configured; serving the seeded in-memory directory");
            let repo = InMemoryUserDirectoryRepository::seeded()
                .map_err(|err| std::io::Error::other(err.to_string()))?;
            Ok(state_over(repo, priority))
        }
    }
}
