//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{UsersCommand, UsersQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UsersQuery>,
    pub commands: Arc<dyn UsersCommand>,
}

impl HttpState {
    /// Construct state from separate query and command ports.
    pub fn new(users: Arc<dyn UsersQuery>, commands: Arc<dyn UsersCommand>) -> Self {
        Self { users, commands }
    }

    /// Construct state from one service implementing both ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use user_directory::domain::{RolePriority, UserDirectoryService};
    /// use user_directory::inbound::http::state::HttpState;
    /// use user_directory::outbound::memory::InMemoryUserDirectoryRepository;
    ///
    /// let repo = Arc::new(InMemoryUserDirectoryRepository::empty());
    /// let service = Arc::new(UserDirectoryService::new(repo, RolePriority::default()));
    /// let _state = HttpState::from_service(service);
    /// ```
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: UsersQuery + UsersCommand + 'static,
    {
        Self {
            users: service.clone(),
            commands: service,
        }
    }
}
